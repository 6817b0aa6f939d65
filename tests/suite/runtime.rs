//! Driving promises from async code on a tokio `LocalSet`.

use tokio::task::{LocalSet, spawn_local};

use promis::{
    FlushBudget, ForeignObject, LocalScheduler, Promise, PromiseError, RuntimeScheduler,
    RuntimeSettings, SchedulerKind, Value, settled,
};

#[tokio::test]
async fn chain_runs_on_the_local_set() {
    LocalSet::new()
        .run_until(async {
            let settings = RuntimeSettings::new(SchedulerKind::LocalSet, FlushBudget::default());
            let runtime = RuntimeScheduler::from_settings(&settings);

            let deferred = Promise::deferred(runtime.scheduler());
            let doubled = deferred
                .promise
                .on_fulfilled(|value| Ok(Value::from(value.as_int().unwrap_or(0) * 2)))
                .on_fulfilled(|value| {
                    Ok(ForeignObject::thenable(move |_, resolve, _| {
                        resolve.call(value.clone());
                        Ok(())
                    })
                    .into_value())
                });
            deferred.resolve.call(21);

            assert_eq!(settled(&doubled).await, Ok(Value::from(42)));
        })
        .await;
}

#[tokio::test]
async fn self_resolution_surfaces_as_err() {
    LocalSet::new()
        .run_until(async {
            let deferred = Promise::deferred(LocalScheduler.handle());
            deferred.resolve.call(deferred.promise.clone());
            assert_eq!(
                settled(&deferred.promise).await,
                Err(Value::Error(PromiseError::SelfResolution))
            );
        })
        .await;
}

#[tokio::test]
async fn adoption_across_tasks() {
    LocalSet::new()
        .run_until(async {
            let source = Promise::deferred(LocalScheduler.handle());
            let adopted = Promise::resolved(LocalScheduler.handle(), source.promise.clone());

            let resolver = source.resolve.clone();
            drop(spawn_local(async move { resolver.call("from another task") }));

            assert_eq!(
                settled(&adopted).await,
                Ok(Value::from("from another task"))
            );
        })
        .await;
}
