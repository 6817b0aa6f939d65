//! Dropping long chains of promises that never settle.

use std::rc::Rc;

use promis::{Deferred, Handler, MicrotaskQueue, Promise, Value};

use crate::common::outcome;

const LINKS: usize = 200_000;

#[test]
fn dropping_a_long_pending_then_chain() {
    let queue = MicrotaskQueue::new();
    let head = Promise::deferred(queue.scheduler());
    let mut tail = head.promise.clone();
    for _ in 0..LINKS {
        tail = tail.then(None, None);
    }
    drop(tail);
    drop(head);
    assert!(queue.is_empty());
}

#[test]
fn dropping_a_long_pending_adoption_chain() {
    let queue = MicrotaskQueue::new();
    let links: Vec<Deferred> = (0..LINKS)
        .map(|_| Promise::deferred(queue.scheduler()))
        .collect();
    for pair in links.windows(2) {
        pair[0].resolve.call(pair[1].promise.clone());
    }
    assert!(queue.is_empty());
    drop(links);
}

#[test]
fn dropping_a_pending_chain_releases_handler_captures() {
    let queue = MicrotaskQueue::new();
    let marker = Rc::new(());
    let head = Promise::deferred(queue.scheduler());
    let mut tail = head.promise.clone();
    for _ in 0..LINKS {
        let held = Rc::clone(&marker);
        tail = tail.then(
            None,
            Handler::new(move |reason| {
                let _ = &held;
                Err(reason)
            }),
        );
    }
    drop(tail);
    drop(head);
    assert_eq!(Rc::strong_count(&marker), 1);
}

#[test]
fn a_dropped_chain_does_not_affect_a_live_one() {
    let queue = MicrotaskQueue::new();
    let live = Promise::deferred(queue.scheduler());
    let result = live.promise.then(None, None);

    let dead = Promise::deferred(queue.scheduler());
    let mut tail = dead.promise.clone();
    for _ in 0..LINKS {
        tail = tail.then(None, None);
    }
    drop(tail);
    drop(dead);

    live.resolve.call(7);
    assert_eq!(outcome(&queue, &result), Ok(Value::from(7)));
}
