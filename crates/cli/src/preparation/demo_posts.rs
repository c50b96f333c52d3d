// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use serde_json::{Value, json};

use super::{Cleanup, Preparation, SharedPreparation};
use crate::error::{Error, Result};
use crate::host::{Host, PostData};

/// Inserts demo posts and deletes them again on cleanup.
pub struct DemoPostsCreation {
    host: Arc<dyn Host>,
    posts: Vec<PostData>,
}

impl DemoPostsCreation {
    pub const NAME: &'static str = "demo_posts_creation";

    pub fn new(host: Arc<dyn Host>, posts: Vec<PostData>) -> Self {
        Self { host, posts }
    }

    /// Shared request for `posts`, deduplicated across checks.
    pub fn shared(posts: Vec<PostData>) -> SharedPreparation {
        SharedPreparation {
            name: Self::NAME,
            args: json!({ "posts": posts }),
            factory: Self::from_args,
        }
    }

    fn from_args(args: &Value, host: &Arc<dyn Host>) -> Result<Box<dyn Preparation>> {
        let posts = args
            .get("posts")
            .cloned()
            .map(serde_json::from_value::<Vec<PostData>>)
            .transpose()
            .map_err(|e| Error::Preparation {
                name: Self::NAME,
                message: format!("invalid arguments: {}", e),
            })?
            .unwrap_or_default();
        Ok(Box::new(Self::new(Arc::clone(host), posts)))
    }
}

fn delete_all(host: &dyn Host, ids: &[u64]) -> Result<()> {
    let mut first_err = None;
    for id in ids {
        if let Err(e) = host.delete_post(*id) {
            tracing::warn!("could not delete demo post {}: {}", id, e);
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}

impl Preparation for DemoPostsCreation {
    fn prepare(&self) -> Result<Cleanup> {
        let mut ids = Vec::with_capacity(self.posts.len());
        for post in &self.posts {
            match self.host.insert_post(post) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    if let Err(rollback_err) = delete_all(self.host.as_ref(), &ids) {
                        tracing::warn!("demo post rollback failed: {}", rollback_err);
                    }
                    return Err(Error::Preparation {
                        name: Self::NAME,
                        message: e.to_string(),
                    });
                }
            }
        }
        tracing::debug!("created {} demo posts", ids.len());

        let host = Arc::clone(&self.host);
        Ok(Cleanup::new(Self::NAME, move || delete_all(host.as_ref(), &ids)))
    }
}

#[cfg(test)]
#[path = "demo_posts_tests.rs"]
mod tests;
