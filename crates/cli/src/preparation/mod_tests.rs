// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::Error;
use crate::host::{MemoryHost, PostData};

fn counting(counter: &Arc<AtomicUsize>) -> Cleanup {
    let counter = Arc::clone(counter);
    Cleanup::new("counting", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn run_invokes_action_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    counting(&counter).run().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn drop_invokes_pending_action() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let _cleanup = counting(&counter);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn unwinding_runs_cleanup() {
    let counter = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&counter);
    let outcome = std::panic::catch_unwind(move || {
        let _cleanup = counting(&inner);
        panic!("check blew up");
    });
    assert!(outcome.is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn chain_runs_in_reverse_and_keeps_first_error() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let part = |name: &'static str, fail: bool| {
        let order = Arc::clone(&order);
        Cleanup::new(name, move || {
            order.lock().unwrap().push(name);
            if fail {
                Err(Error::Host(name.to_string()))
            } else {
                Ok(())
            }
        })
    };

    let chained = Cleanup::chain("all", vec![part("a", true), part("b", false), part("c", true)]);
    let err = chained.run().unwrap_err();
    assert_eq!(*order.lock().unwrap(), vec!["c", "b", "a"]);
    assert_eq!(err.to_string(), "host error: c");
}

#[test]
fn noop_is_noop() {
    let cleanup = Cleanup::noop();
    assert!(cleanup.is_noop());
    cleanup.run().unwrap();
}

#[test]
fn guarded_cleans_up_after_failure() {
    let counter = Arc::new(AtomicUsize::new(0));
    let out: Result<()> = guarded(counting(&counter), || Err(Error::Internal("boom".into())));
    assert!(matches!(out, Err(Error::Internal(_))));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn guarded_reports_cleanup_failure_after_success() {
    let cleanup = Cleanup::new("failing", || Err(Error::Host("gone".into())));
    let out = guarded(cleanup, || Ok(5));
    assert!(matches!(out, Err(Error::Host(_))));
}

#[test]
fn shared_keys_ignore_argument_order() {
    let mut a = DemoPostsCreation::shared(Vec::new());
    a.args = serde_json::json!({ "a": 1, "b": [1, 2] });
    let mut b = a.clone();
    b.args = serde_json::from_str(r#"{"b":[1,2],"a":1}"#).unwrap();
    assert_eq!(a.key(), b.key());

    b.args = serde_json::json!({ "a": 2, "b": [1, 2] });
    assert_ne!(a.key(), b.key());
}

#[test]
fn shared_demo_posts_build_from_args() {
    let shared = DemoPostsCreation::shared(vec![PostData::demo("post")]);
    assert_eq!(shared.name, DemoPostsCreation::NAME);

    let memory = Arc::new(MemoryHost::new("/srv/wp"));
    let host: Arc<dyn Host> = memory.clone();
    let preparation = shared.build(&host).unwrap();
    let cleanup = preparation.prepare().unwrap();
    assert_eq!(memory.post_ids().len(), 1);
    cleanup.run().unwrap();
    assert!(memory.post_ids().is_empty());
}
