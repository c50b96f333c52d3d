// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Checks backed by a PHP_CodeSniffer standard.
//!
//! Each rule names a standard and the sniffs to restrict it to. The linter
//! report is mapped onto the result: `ERROR` entries become errors, the
//! rest warnings.

use std::sync::Arc;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode, Stability};
use crate::error::Result;
use crate::linter::{Linter, apply_report};
use crate::result::CheckResult;

/// A phpcs-backed check.
#[derive(Debug, Clone, Copy)]
pub struct PhpcsRule {
    pub slug: &'static str,
    pub standard: &'static str,
    pub sniffs: &'static str,
    pub categories: &'static [Category],
    pub stability: Stability,
    pub description: &'static str,
    pub documentation_url: &'static str,
}

const HANDBOOK: &str = "https://developer.wordpress.org/plugins/";

pub const RULES: &[PhpcsRule] = &[
    PhpcsRule {
        slug: "i18n_usage",
        standard: "WordPress",
        sniffs: "WordPress.WP.I18n",
        categories: &[Category::GENERAL],
        stability: Stability::Stable,
        description: "Checks for various internationalization best practices.",
        documentation_url: "https://developer.wordpress.org/plugins/internationalization/how-to-internationalize-your-plugin/",
    },
    PhpcsRule {
        slug: "late_escaping",
        standard: "WordPress",
        sniffs: "WordPress.Security.EscapeOutput",
        categories: &[Category::SECURITY],
        stability: Stability::Stable,
        description: "Checks that all output is escaped before being printed.",
        documentation_url: "https://developer.wordpress.org/apis/security/escaping/",
    },
    PhpcsRule {
        slug: "plugin_review_phpcs",
        standard: "WordPress",
        sniffs: "Generic.PHP.DisallowShortOpenTag,Generic.PHP.DisallowAlternativePHPTags,Generic.PHP.ForbiddenFunctions,WordPress.WP.DeprecatedFunctions,WordPress.WP.DeprecatedClasses,WordPress.WP.DeprecatedParameters,WordPress.PHP.DontExtract,WordPress.PHP.RestrictedPHPFunctions,WordPress.WP.AlternativeFunctions,WordPress.Security.ValidatedSanitizedInput,WordPress.Security.NonceVerification",
        categories: &[Category::PLUGIN_REPO],
        stability: Stability::Stable,
        description: "Runs the coding standard rules used in the plugin review.",
        documentation_url: "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/",
    },
    PhpcsRule {
        slug: "direct_db_queries",
        standard: "WordPress",
        sniffs: "WordPress.DB.DirectDatabaseQuery,WordPress.DB.PreparedSQL,WordPress.DB.PreparedSQLPlaceholders",
        categories: &[Category::SECURITY],
        stability: Stability::Stable,
        description: "Checks the usage of direct database queries, which should be avoided.",
        documentation_url: "https://developer.wordpress.org/apis/database/",
    },
    PhpcsRule {
        slug: "performant_wp_query_params",
        standard: "WordPress",
        sniffs: "WordPress.DB.SlowDBQuery,WordPress.WP.PostsPerPage",
        categories: &[Category::PERFORMANCE],
        stability: Stability::Stable,
        description: "Checks for potentially slow database query parameters.",
        documentation_url: HANDBOOK,
    },
    PhpcsRule {
        slug: "enqueued_scripts_in_footer",
        standard: "WordPress",
        sniffs: "WordPress.WP.EnqueuedResourceParameters",
        categories: &[Category::PERFORMANCE],
        stability: Stability::Stable,
        description: "Checks whether scripts are loaded in the footer or deferred.",
        documentation_url: "https://developer.wordpress.org/reference/functions/wp_enqueue_script/",
    },
    PhpcsRule {
        slug: "enqueued_resources",
        standard: "WordPress",
        sniffs: "WordPress.WP.EnqueuedResources",
        categories: &[Category::PLUGIN_REPO, Category::PERFORMANCE],
        stability: Stability::Stable,
        description: "Checks that scripts and styles are enqueued rather than printed.",
        documentation_url: "https://developer.wordpress.org/plugins/javascript/enqueuing/",
    },
    PhpcsRule {
        slug: "localhost",
        standard: "PluginCheck",
        sniffs: "PluginCheck.CodeAnalysis.Localhost",
        categories: &[Category::PLUGIN_REPO],
        stability: Stability::Stable,
        description: "Detects references to localhost URLs.",
        documentation_url: HANDBOOK,
    },
    PhpcsRule {
        slug: "setting_sanitization",
        standard: "PluginCheck",
        sniffs: "PluginCheck.CodeAnalysis.SettingSanitization",
        categories: &[Category::PLUGIN_REPO],
        stability: Stability::Experimental,
        description: "Checks that registered settings are sanitized.",
        documentation_url: "https://developer.wordpress.org/apis/security/sanitizing/",
    },
    PhpcsRule {
        slug: "offloading_files",
        standard: "PluginCheck",
        sniffs: "PluginCheck.CodeAnalysis.Offloading",
        categories: &[Category::PLUGIN_REPO, Category::PERFORMANCE],
        stability: Stability::Stable,
        description: "Detects assets loaded from external content delivery networks.",
        documentation_url: "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/#8-plugins-may-not-send-executable-code-via-third-party-systems",
    },
];

/// Runs one [`PhpcsRule`] through a [`Linter`].
pub struct PhpcsCheck {
    rule: &'static PhpcsRule,
    linter: Arc<dyn Linter>,
}

impl PhpcsCheck {
    pub fn new(rule: &'static PhpcsRule, linter: Arc<dyn Linter>) -> Self {
        Self { rule, linter }
    }

    pub fn rule(&self) -> &PhpcsRule {
        self.rule
    }
}

impl Check for PhpcsCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn stability(&self) -> Stability {
        self.rule.stability
    }

    fn categories(&self) -> Vec<Category> {
        self.rule.categories.to_vec()
    }

    fn description(&self) -> &str {
        self.rule.description
    }

    fn documentation_url(&self) -> &str {
        self.rule.documentation_url
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.linter.is_available()).then(|| "the phpcs executable was not found".to_string())
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context();
        let target = if context.is_single_file() {
            context.main_file().to_path_buf()
        } else {
            context.path("")
        };
        let args = [
            ("sniffs", self.rule.sniffs),
            ("extensions", "php"),
            ("ignore", "*/vendor/*,*/node_modules/*"),
        ];
        let report = self.linter.run(self.rule.standard, &args, &target)?;
        apply_report(&report, result);
        Ok(())
    }
}

#[cfg(test)]
#[path = "phpcs_tests.rs"]
mod tests;
