//! Context-scoped storage for the acting identity.
//!
//! Resolution order in [`CurrentIdentity::get`] is task-local first, then
//! thread-local: a save inside a task scope always sees its own request's
//! identity, while synchronous code under an [`IdentityScope`] guard sees the
//! innermost guard on its thread.

use crate::identity::Identity;
use std::cell::RefCell;
use std::marker::PhantomData;

#[cfg(feature = "task-scope")]
use std::future::Future;

thread_local! {
    static THREAD_IDENTITY: RefCell<Vec<Identity>> = const { RefCell::new(Vec::new()) };
}

#[cfg(feature = "task-scope")]
tokio::task_local! {
    static TASK_IDENTITY: Identity;
}

/// Accessors for the identity of the current unit of execution.
pub struct CurrentIdentity;

impl CurrentIdentity {
    /// Installs `identity` for the current thread until the returned guard
    /// drops. Scopes nest; dropping restores the previous one.
    ///
    /// For async code use [`CurrentIdentity::scope`] instead: a thread-local
    /// guard held across an await would bleed into other requests sharing the
    /// worker thread.
    #[must_use = "identity is cleared when the returned scope is dropped"]
    pub fn enter(identity: Identity) -> IdentityScope {
        THREAD_IDENTITY.with(|stack| stack.borrow_mut().push(identity));
        IdentityScope {
            _not_send: PhantomData,
        }
    }

    /// Runs `future` with `identity` visible to everything executing inside
    /// it, regardless of which worker threads the task migrates across.
    /// The identity is gone when the future completes or is dropped.
    #[cfg(feature = "task-scope")]
    pub fn scope<F>(identity: Identity, future: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        TASK_IDENTITY.scope(identity, future)
    }

    /// Returns the identity in scope, if any.
    pub fn get() -> Option<Identity> {
        #[cfg(feature = "task-scope")]
        if let Ok(identity) = TASK_IDENTITY.try_with(Identity::clone) {
            return Some(identity);
        }

        THREAD_IDENTITY.with(|stack| stack.borrow().last().cloned())
    }

    /// True when any identity is in scope.
    pub fn is_set() -> bool {
        Self::get().is_some()
    }
}

/// RAII guard for a thread-scoped identity.
///
/// Not `Send`: the guard must drop on the thread that created it.
pub struct IdentityScope {
    _not_send: PhantomData<*const ()>,
}

impl Drop for IdentityScope {
    fn drop(&mut self) {
        THREAD_IDENTITY.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trail_commons::{SessionKey, UserId};

    fn identity(user: &str, session: &str) -> Identity {
        Identity::new(UserId::new(user), SessionKey::new(session))
    }

    #[test]
    fn no_identity_outside_any_scope() {
        assert_eq!(CurrentIdentity::get(), None);
        assert!(!CurrentIdentity::is_set());
    }

    #[test]
    fn guard_installs_and_clears_identity() {
        {
            let _scope = CurrentIdentity::enter(identity("u1", "s1"));
            let current = CurrentIdentity::get().unwrap();
            assert_eq!(current.user, Some(UserId::new("u1")));
        }
        assert_eq!(CurrentIdentity::get(), None);
    }

    #[test]
    fn scopes_nest_and_restore() {
        let _outer = CurrentIdentity::enter(identity("u1", "s1"));
        {
            let _inner = CurrentIdentity::enter(identity("u2", "s2"));
            assert_eq!(
                CurrentIdentity::get().unwrap().user,
                Some(UserId::new("u2"))
            );
        }
        assert_eq!(
            CurrentIdentity::get().unwrap().user,
            Some(UserId::new("u1"))
        );
    }

    #[test]
    fn threads_do_not_observe_each_others_identity() {
        let _scope = CurrentIdentity::enter(identity("main", "s-main"));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    assert_eq!(CurrentIdentity::get(), None);
                    let user = format!("u{}", i);
                    let _scope =
                        CurrentIdentity::enter(identity(&user, &format!("s{}", i)));
                    // Each thread only ever sees what it installed itself.
                    assert_eq!(
                        CurrentIdentity::get().unwrap().user,
                        Some(UserId::new(user))
                    );
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            CurrentIdentity::get().unwrap().user,
            Some(UserId::new("main"))
        );
    }

    #[cfg(feature = "task-scope")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_tasks_keep_their_own_identity() {
        let mut handles = Vec::new();
        for i in 0..8 {
            handles.push(tokio::spawn(CurrentIdentity::scope(
                identity(&format!("u{}", i), &format!("s{}", i)),
                async move {
                    tokio::task::yield_now().await;
                    let current = CurrentIdentity::get().unwrap();
                    assert_eq!(current.user, Some(UserId::new(format!("u{}", i))));
                    tokio::task::yield_now().await;
                    assert_eq!(
                        CurrentIdentity::get().unwrap().session_key,
                        Some(SessionKey::new(format!("s{}", i)))
                    );
                },
            )));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(CurrentIdentity::get(), None);
    }

    #[cfg(feature = "task-scope")]
    #[tokio::test]
    async fn task_scope_shadows_thread_scope() {
        let _thread_scope = CurrentIdentity::enter(identity("thread", "st"));
        CurrentIdentity::scope(identity("task", "sk"), async {
            assert_eq!(
                CurrentIdentity::get().unwrap().user,
                Some(UserId::new("task"))
            );
        })
        .await;
        assert_eq!(
            CurrentIdentity::get().unwrap().user,
            Some(UserId::new("thread"))
        );
    }
}
