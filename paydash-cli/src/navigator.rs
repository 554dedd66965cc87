use paydash_client::Navigator;
use tracing::info;

/// Terminal stand-in for returning to the login screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect_to_root(&self) {
        info!("stored session rejected by the backend");
        eprintln!("session expired; run `paydash login` to sign in again");
    }
}
