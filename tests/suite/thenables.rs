//! Interop with foreign thenables and deep resolution chains.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use promis::{
    Deferred, Foreign, ForeignObject, MicrotaskQueue, Promise, RejectFn, ResolveFn, ThenFn,
    ThenMember, Value,
};

use crate::common::{flush, observe, outcome};

#[test]
fn thenable_calling_both_capabilities_keeps_the_first() {
    let queue = MicrotaskQueue::new();
    let thenable = ForeignObject::thenable(|_, resolve, reject| {
        resolve.call("first");
        reject.call("second");
        resolve.call("third");
        Ok(())
    });
    let promise = Promise::resolved(queue.scheduler(), thenable.into_value());
    assert_eq!(outcome(&queue, &promise), Ok(Value::from("first")));
}

#[test]
fn thenable_rejecting_twice_keeps_the_first() {
    let queue = MicrotaskQueue::new();
    let thenable = ForeignObject::thenable(|_, _, reject| {
        reject.call("first");
        reject.call("second");
        Ok(())
    });
    let promise = Promise::resolved(queue.scheduler(), thenable.into_value());
    assert_eq!(outcome(&queue, &promise), Err(Value::from("first")));
}

#[test]
fn thenable_settling_on_a_later_turn() {
    let queue = MicrotaskQueue::new();
    let parked: Rc<RefCell<Option<(ResolveFn, RejectFn)>>> = Rc::default();
    let slot = Rc::clone(&parked);
    let thenable = ForeignObject::thenable(move |_, resolve, reject| {
        *slot.borrow_mut() = Some((resolve, reject));
        Ok(())
    });

    let promise = Promise::resolved(queue.scheduler(), thenable.into_value());
    let observed = observe(&promise);
    flush(&queue);
    assert!(observed.is_empty());

    let (resolve, reject) = parked.borrow_mut().take().expect("then was called");
    resolve.call("later");
    reject.call("ignored");
    resolve.call("ignored too");
    flush(&queue);
    assert_eq!(observed.single(), Ok(Value::from("later")));
}

#[test]
fn thenable_that_never_calls_back_stays_pending() {
    let queue = MicrotaskQueue::new();
    let thenable = ForeignObject::thenable(|_, _, _| Ok(()));
    let promise = Promise::resolved(queue.scheduler(), thenable.into_value());
    let observed = observe(&promise);
    flush(&queue);
    assert!(observed.is_empty());
    assert!(queue.is_empty());
}

#[test]
fn throwing_then_accessor_rejects() {
    let queue = MicrotaskQueue::new();
    let promise = Promise::resolved(
        queue.scheduler(),
        ForeignObject::with_throwing_then("getter threw").into_value(),
    );
    assert_eq!(outcome(&queue, &promise), Err(Value::from("getter threw")));
}

#[test]
fn throwing_then_call_rejects_unless_already_settled() {
    let queue = MicrotaskQueue::new();
    let throws = ForeignObject::thenable(|_, _, _| Err(Value::from("then threw")));
    let settles_then_throws = ForeignObject::thenable(|_, resolve, _| {
        resolve.call("kept");
        Err(Value::from("ignored"))
    });

    let first = Promise::resolved(queue.scheduler(), throws.into_value());
    let second = Promise::resolved(queue.scheduler(), settles_then_throws.into_value());
    assert_eq!(outcome(&queue, &first), Err(Value::from("then threw")));
    assert_eq!(outcome(&queue, &second), Ok(Value::from("kept")));
}

#[test]
fn non_callable_then_fulfills_with_the_object() {
    let queue = MicrotaskQueue::new();
    let object = ForeignObject::with_then_value(5).into_value();
    let promise = Promise::resolved(queue.scheduler(), object.clone());
    assert_eq!(outcome(&queue, &promise), Ok(object));
}

#[test]
fn handler_returning_a_thenable_is_assimilated() {
    let queue = MicrotaskQueue::new();
    let chained = Promise::resolved(queue.scheduler(), 2).on_fulfilled(|value| {
        let doubled = value.as_int().unwrap_or(0) * 2;
        Ok(ForeignObject::thenable(move |_, resolve, _| {
            resolve.call(doubled);
            Ok(())
        })
        .into_value())
    });
    assert_eq!(outcome(&queue, &chained), Ok(Value::from(4)));
}

/// A thenable implemented directly against the trait, with an accessor that
/// counts its reads.
#[derive(Debug, Default)]
struct Getter {
    reads: Cell<u32>,
}

impl Foreign for Getter {
    fn then_member(&self) -> Result<ThenMember, Value> {
        self.reads.set(self.reads.get() + 1);
        if self.reads.get() > 1 {
            return Err(Value::from("then read twice"));
        }
        let then: ThenFn = Rc::new(
            |_: &Value, resolve: ResolveFn, _: RejectFn| -> Result<(), Value> {
                resolve.call("read once");
                Ok(())
            },
        );
        Ok(ThenMember::Callable(then))
    }
}

#[test]
fn then_member_is_read_once_per_resolution() {
    let queue = MicrotaskQueue::new();
    let getter = Rc::new(Getter::default());
    let promise = Promise::resolved(queue.scheduler(), Value::Object(getter.clone()));
    assert_eq!(outcome(&queue, &promise), Ok(Value::from("read once")));
    assert_eq!(getter.reads.get(), 1);
}

#[test]
fn deep_chain_of_pending_promises_settles() {
    let queue = MicrotaskQueue::new();
    let links: Vec<Deferred> = (0..20_000)
        .map(|_| Promise::deferred(queue.scheduler()))
        .collect();
    for pair in links.windows(2) {
        pair[0].resolve.call(pair[1].promise.clone());
    }
    let head = observe(&links[0].promise);
    let tail = links.last().expect("non-empty chain");
    tail.resolve.call("bottom");
    drop(links);

    flush(&queue);
    assert_eq!(head.single(), Ok(Value::from("bottom")));
}

#[test]
fn deep_chain_of_nested_thenables_settles() {
    fn nest(depth: u32) -> Value {
        if depth == 0 {
            return Value::from("core");
        }
        ForeignObject::thenable(move |_, resolve, _| {
            resolve.call(nest(depth - 1));
            Ok(())
        })
        .into_value()
    }

    let queue = MicrotaskQueue::new();
    let promise = Promise::resolved(queue.scheduler(), nest(20_000));
    assert_eq!(outcome(&queue, &promise), Ok(Value::from("core")));
}
