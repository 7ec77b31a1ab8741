//! Production `Pacer`: a plain timer sleep on the current-thread runtime.

use std::time::Duration;

use crate::application::ports::Pacer;

pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
