use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::account::Account;
use crate::address::Address;
use crate::notifier::Interaction;

/// Correlates a shown notification with the data needed to act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextToken(u64);

impl fmt::Display for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct NotificationContext {
    pub account: Arc<dyn Account>,
    pub address: Address,
}

/// Pending notification contexts. Every context leaves the table exactly
/// once, whichever callback gets to it first.
#[derive(Default)]
pub struct ContextTable {
    next_token: AtomicU64,
    pending: Mutex<HashMap<ContextToken, NotificationContext>>,
    released: Condvar,
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContextToken, NotificationContext>> {
        // A panicking account action never runs under this lock, so the map
        // is consistent even if poisoned.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, context: NotificationContext) -> ContextToken {
        let token = ContextToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(token, context);
        token
    }

    /// Remove and return the context for `token`. Returns `None` once it has
    /// already been released.
    pub fn take(&self, token: ContextToken) -> Option<NotificationContext> {
        let context = self.lock().remove(&token);
        if context.is_some() {
            self.released.notify_all();
        }
        context
    }

    /// Block until `token` has been released or `timeout` passes. Returns
    /// whether the context is gone.
    pub fn wait_released(&self, token: ContextToken, timeout: Duration) -> bool {
        let (pending, _) = self
            .released
            .wait_timeout_while(self.lock(), timeout, |pending| pending.contains_key(&token))
            .unwrap_or_else(|e| e.into_inner());
        !pending.contains_key(&token)
    }

    /// Release the context and run the account's default action if the
    /// notification was clicked. Returns whether the context was still held.
    pub fn resolve(&self, token: ContextToken, interaction: Interaction) -> bool {
        let Some(context) = self.take(token) else {
            tracing::debug!(token = %token, ?interaction, "Context already released");
            return false;
        };
        match interaction {
            Interaction::Clicked => {
                tracing::debug!(token = %token, address = %context.address, "Notification clicked");
                context.account.default_action(&context.address);
            }
            Interaction::TimedOut => {
                tracing::debug!(token = %token, address = %context.address, "Notification timed out");
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utilities::RecordingAccount;
    use std::thread;

    fn context(account: &Arc<RecordingAccount>, address: &str) -> NotificationContext {
        NotificationContext {
            account: account.clone(),
            address: address.parse().unwrap(),
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let table = ContextTable::new();
        let account = Arc::new(RecordingAccount::default());
        let first = table.insert(context(&account, "a@example.com"));
        let second = table.insert(context(&account, "b@example.com"));
        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_click_runs_default_action_once() {
        let table = ContextTable::new();
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com/home"));

        assert!(table.resolve(token, Interaction::Clicked));
        assert!(!table.resolve(token, Interaction::TimedOut));
        assert!(!table.resolve(token, Interaction::Clicked));

        assert_eq!(account.actions(), vec!["bob@example.com/home".to_string()]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_timeout_releases_without_action() {
        let table = ContextTable::new();
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com"));

        assert!(table.resolve(token, Interaction::TimedOut));
        assert!(!table.resolve(token, Interaction::Clicked));

        assert!(account.actions().is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_concurrent_delivery_releases_exactly_once() {
        let table = Arc::new(ContextTable::new());
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = Arc::clone(&table);
                let interaction = if i % 2 == 0 {
                    Interaction::Clicked
                } else {
                    Interaction::TimedOut
                };
                thread::spawn(move || (interaction, table.resolve(token, interaction)))
            })
            .collect();
        let winners: Vec<Interaction> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|(_, released)| *released)
            .map(|(interaction, _)| interaction)
            .collect();

        assert_eq!(winners.len(), 1);
        let expected_actions = match winners[0] {
            Interaction::Clicked => 1,
            Interaction::TimedOut => 0,
        };
        assert_eq!(account.actions().len(), expected_actions);
        assert!(table.is_empty());
    }

    #[test]
    fn test_concurrent_clicks_run_default_action_once() {
        let table = Arc::new(ContextTable::new());
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com/home"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.resolve(token, Interaction::Clicked))
            })
            .collect();
        let released = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|released| *released)
            .count();

        assert_eq!(released, 1);
        assert_eq!(account.actions(), vec!["bob@example.com/home".to_string()]);
    }

    #[test]
    fn test_wait_released_wakes_on_resolve() {
        let table = Arc::new(ContextTable::new());
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com"));

        let resolver = {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                table.resolve(token, Interaction::Clicked)
            })
        };

        assert!(table.wait_released(token, Duration::from_secs(5)));
        assert!(resolver.join().unwrap());
        assert_eq!(account.actions().len(), 1);
    }

    #[test]
    fn test_wait_released_times_out_while_pending() {
        let table = ContextTable::new();
        let account = Arc::new(RecordingAccount::default());
        let token = table.insert(context(&account, "bob@example.com"));
        let other = table.insert(context(&account, "carol@example.com"));
        table.resolve(other, Interaction::TimedOut);

        assert!(!table.wait_released(token, Duration::from_millis(20)));
        assert_eq!(table.len(), 1);
    }
}
