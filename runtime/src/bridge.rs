use std::cell::RefCell;
use std::future::{Future, pending};
use std::rc::Rc;

use tokio::sync::oneshot;

use promis_core::{Handler, Promise, Value};

type Outcome = Result<Value, Value>;
type Slot = Rc<RefCell<Option<oneshot::Sender<Outcome>>>>;

/// Await the settlement of `promise`.
///
/// Registers an ordinary continuation, so the output becomes available only
/// after the promise's scheduler runs it. Resolves to `Ok(value)` or
/// `Err(reason)`. If the continuation is discarded without running (its
/// scheduler went away), the future stays pending, like the promise itself.
pub fn settled(promise: &Promise) -> impl Future<Output = Outcome> + use<> {
    let (sender, receiver) = oneshot::channel();
    let on_value: Slot = Rc::new(RefCell::new(Some(sender)));
    let on_reason = Rc::clone(&on_value);

    let _ = promise.then(
        Handler::new(move |value| {
            deliver(&on_value, Ok(value));
            Ok(Value::Undefined)
        }),
        Handler::new(move |reason| {
            deliver(&on_reason, Err(reason));
            Ok(Value::Undefined)
        }),
    );

    async move {
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => pending().await,
        }
    }
}

fn deliver(slot: &Slot, outcome: Outcome) {
    if let Some(sender) = slot.borrow_mut().take() {
        // Receiver dropped: nobody is waiting anymore.
        let _ = sender.send(outcome);
    }
}
