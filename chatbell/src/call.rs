use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::account::Account;
use crate::address::Address;

#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Media {
    Audio,
    Video,
}

/// An inbound call that has already been set up by the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSession {
    pub id: String,
    pub peer: Address,
    pub media: Vec<Media>,
}

impl CallSession {
    pub fn new(id: &str, peer: Address, media: Vec<Media>) -> Self {
        Self {
            id: id.to_string(),
            peer,
            media,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CallState {
    #[default]
    Unconfigured,
    Outgoing(Address),
    Incoming(CallSession),
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Unconfigured => f.write_str("unconfigured"),
            CallState::Outgoing(address) => write!(f, "outgoing call to {}", address),
            CallState::Incoming(session) => {
                let media: Vec<String> = session.media.iter().map(Media::to_string).collect();
                write!(
                    f,
                    "incoming call from {} (session {}, {})",
                    session.peer,
                    session.id,
                    media.join("+")
                )
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CallError {
    #[error("call dialog is already configured as {current}")]
    DoubleConfiguration { current: String },
}

/// A call window bound to one account. Each dialog handles a single call:
/// it is configured once, either for an outgoing or an incoming call.
pub struct CallDialog {
    account: Arc<dyn Account>,
    state: CallState,
}

impl CallDialog {
    pub fn new(account: Arc<dyn Account>) -> Self {
        Self {
            account,
            state: CallState::Unconfigured,
        }
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    fn configure(&mut self, state: CallState) -> Result<(), CallError> {
        if self.state != CallState::Unconfigured {
            tracing::warn!(current = %self.state, requested = %state, "Rejecting call dialog reconfiguration");
            return Err(CallError::DoubleConfiguration {
                current: self.state.to_string(),
            });
        }
        tracing::debug!(account = %self.account.name(), state = %state, "Call dialog configured");
        self.state = state;
        Ok(())
    }

    /// Prepare the dialog to call `address`.
    pub fn set_outgoing(&mut self, address: Address) -> Result<(), CallError> {
        self.configure(CallState::Outgoing(address))
    }

    /// Prepare the dialog to present an inbound `session`.
    pub fn set_incoming(&mut self, session: CallSession) -> Result<(), CallError> {
        self.configure(CallState::Incoming(session))
    }

    pub fn reset(&mut self) {
        self.state = CallState::Unconfigured;
    }

    /// Address on the other end of the call.
    pub fn peer(&self) -> Option<&Address> {
        match &self.state {
            CallState::Unconfigured => None,
            CallState::Outgoing(address) => Some(address),
            CallState::Incoming(session) => Some(&session.peer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utilities::RecordingAccount;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dialog() -> CallDialog {
        CallDialog::new(Arc::new(RecordingAccount::default()))
    }

    fn session() -> CallSession {
        CallSession::new(
            "sid-1",
            "carol@example.com/phone".parse().unwrap(),
            vec![Media::Audio, Media::Video],
        )
    }

    #[rstest]
    fn test_new_dialog_is_unconfigured(dialog: CallDialog) {
        assert_eq!(dialog.state(), &CallState::Unconfigured);
        assert_eq!(dialog.peer(), None);
    }

    #[rstest]
    fn test_outgoing(mut dialog: CallDialog) {
        let address: Address = "bob@example.com".parse().unwrap();
        dialog.set_outgoing(address.clone()).unwrap();
        assert_eq!(dialog.state(), &CallState::Outgoing(address.clone()));
        assert_eq!(dialog.peer(), Some(&address));
    }

    #[rstest]
    fn test_incoming(mut dialog: CallDialog) {
        dialog.set_incoming(session()).unwrap();
        assert_eq!(
            dialog.peer().map(Address::to_string),
            Some("carol@example.com/phone".to_string())
        );
        assert_eq!(
            dialog.state().to_string(),
            "incoming call from carol@example.com/phone (session sid-1, audio+video)"
        );
    }

    #[rstest]
    fn test_outgoing_then_incoming_is_rejected(mut dialog: CallDialog) {
        let address: Address = "bob@example.com".parse().unwrap();
        dialog.set_outgoing(address.clone()).unwrap();

        let err = dialog.set_incoming(session()).unwrap_err();
        assert_eq!(
            err,
            CallError::DoubleConfiguration {
                current: "outgoing call to bob@example.com".to_string()
            }
        );
        assert_eq!(dialog.state(), &CallState::Outgoing(address));
    }

    #[rstest]
    fn test_incoming_then_outgoing_is_rejected(mut dialog: CallDialog) {
        dialog.set_incoming(session()).unwrap();
        let result = dialog.set_outgoing("bob@example.com".parse().unwrap());
        assert!(matches!(result, Err(CallError::DoubleConfiguration { .. })));
        assert_eq!(dialog.state(), &CallState::Incoming(session()));
    }

    #[rstest]
    fn test_same_configuration_twice_is_rejected(mut dialog: CallDialog) {
        let address: Address = "bob@example.com".parse().unwrap();
        dialog.set_outgoing(address.clone()).unwrap();
        assert!(dialog.set_outgoing(address).is_err());

        let mut incoming = CallDialog::new(Arc::new(RecordingAccount::default()));
        incoming.set_incoming(session()).unwrap();
        assert!(incoming.set_incoming(session()).is_err());
    }

    #[rstest]
    fn test_reset_allows_reconfiguration(mut dialog: CallDialog) {
        dialog.set_outgoing("bob@example.com".parse().unwrap()).unwrap();
        dialog.reset();
        dialog.set_incoming(session()).unwrap();
        assert!(matches!(dialog.state(), CallState::Incoming(_)));
    }
}
