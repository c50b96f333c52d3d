// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Restricted terms in the plugin name and slug.
//!
//! Terms ending with `-` are only restricted at the start of a slug, the
//! rest anywhere. Some terms may close a name as `for <term>`.

use aho_corasick::AhoCorasick;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::{Error, Result};
use crate::readme::{Readme, find_readme};
use crate::result::{CheckResult, MessageArgs};

use super::main_header;

/// Restricted terms, matched against slugified names.
pub const TRADEMARKS: &[&str] = &[
    "adobe-",
    "adsense-",
    "advanced-custom-fields-",
    "adwords-",
    "akismet-",
    "all-in-one-wp-migration",
    "amazon-",
    "android-",
    "apple-",
    "applenews-",
    "aws-",
    "bbpress-",
    "bing-",
    "bootstrap-",
    "buddypress-",
    "chatgpt-",
    "chat-gpt-",
    "contact-form-7-",
    "cpanel-",
    "disqus-",
    "divi-",
    "dropbox-",
    "easy-digital-downloads-",
    "elementor-",
    "envato-",
    "fbook",
    "facebook",
    "fb-",
    "fedex-",
    "feedburner",
    "firefox-",
    "fontawesome-",
    "font-awesome-",
    "ganalytics-",
    "gberg",
    "github-",
    "givewp-",
    "google-",
    "googlebot-",
    "googles-",
    "gravity-form-",
    "gravity-forms-",
    "gravityforms-",
    "gutenberg",
    "guten-",
    "hubspot-",
    "ig-",
    "insta-",
    "instagram",
    "internet-explorer-",
    "jetpack-",
    "macintosh-",
    "mailchimp-",
    "microsoft-",
    "ninja-forms-",
    "oculus",
    "onlyfans-",
    "only-fans-",
    "opera-",
    "paddle-",
    "paypal-",
    "pinterest-",
    "skype-",
    "stripe-",
    "tiktok-",
    "tik-tok-",
    "trustpilot",
    "twitch-",
    "twitter-",
    "tweet",
    "ups-",
    "usps-",
    "vvhatsapp",
    "vvcommerce",
    "vva-",
    "vvoocommerce",
    "wa-",
    "wh4tsapps",
    "whatsapp",
    "whats-app",
    "watson",
    "windows-",
    "wocommerce",
    "woocom-",
    "woocommerce",
    "woocomerce",
    "woo-commerce",
    "woo-",
    "wo-",
    "wordpress",
    "wordpess",
    "wpress",
    "wp-mail-smtp-",
    "yandex-",
    "yahoo-",
    "yoast",
    "youtube-",
    "you-tube-",
];

/// Terms allowed at the end of a name as `for <term>`.
pub const FOR_USE_EXCEPTIONS: &[&str] = &["woocommerce"];

pub struct TrademarksCheck {
    terms: Vec<String>,
    automaton: AhoCorasick,
}

impl TrademarksCheck {
    /// Built-in terms plus `extra_terms`.
    pub fn new(extra_terms: &[String]) -> Result<Self> {
        let terms: Vec<String> = TRADEMARKS
            .iter()
            .map(|t| t.to_string())
            .chain(extra_terms.iter().filter_map(|t| {
                let slug = slugify(t);
                match (slug.is_empty(), t.trim().ends_with('-')) {
                    (true, _) => None,
                    (false, true) => Some(format!("{}-", slug)),
                    (false, false) => Some(slug),
                }
            }))
            .collect();
        let automaton = AhoCorasick::new(&terms)
            .map_err(|e| Error::Internal(format!("trademark automaton: {}", e)))?;
        Ok(Self { terms, automaton })
    }

    /// First restricted term in `name`, in term order.
    pub fn find_term(&self, name: &str) -> Option<&str> {
        let mut slug = slugify(name);
        for exception in FOR_USE_EXCEPTIONS {
            if let Some(stripped) = slug.strip_suffix(&format!("-for-{}", exception)) {
                slug = stripped.to_string();
                break;
            }
        }

        self.automaton
            .find_overlapping_iter(slug.as_str())
            .filter(|m| {
                let term = &self.terms[m.pattern().as_usize()];
                !term.ends_with('-') || m.start() == 0
            })
            .map(|m| m.pattern().as_usize())
            .min()
            .map(|i| self.terms[i].trim_end_matches('-'))
    }

    fn name_message(&self, kind: &str, name: &str, term: &str) -> String {
        let mut message = format!(
            "The plugin {} includes a restricted term. Your chosen plugin {} - \"{}\" - contains the restricted term \"{}\" which cannot be used within your plugin {}",
            kind, kind, name, term, kind
        );
        if FOR_USE_EXCEPTIONS.contains(&term) {
            message.push_str(&format!(", unless your plugin {} ends with \"for {}\"", kind, term));
        }
        message.push('.');
        message
    }
}

/// Lowercase, with runs of non-alphanumerics collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl Check for TrademarksCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Checks the usage of trademarks or restricted terms in the plugin name and slug."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/#17-plugins-must-respect-trademarks-copyrights-and-project-names"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context().clone();

        if !context.is_single_file()
            && let Some(readme_path) = find_readme(&context.path(""))
        {
            let readme = Readme::read(&readme_path)?;
            if let Some(term) = self.find_term(&readme.name) {
                let message = self.name_message("name", &readme.name, term);
                result.add_error(message, MessageArgs::new("trademarked_term").file(&readme_path));
            }
        }

        let header = main_header(&context)?;
        if let Some(term) = self.find_term(&header.name) {
            let message = self.name_message("name", &header.name, term);
            result.add_error(
                message,
                MessageArgs::new("trademarked_term").file(context.main_file()),
            );
        }

        if let Some(term) = self.find_term(context.slug()) {
            let message = self.name_message("slug", context.slug(), term);
            result.add_error(
                message,
                MessageArgs::new("trademarked_term").file(context.main_file()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "trademarks_tests.rs"]
mod tests;
