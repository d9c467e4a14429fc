use crate::domain::{Position, PositionError, PositionOptions};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Something that can asynchronously produce the current position of the device.
#[async_trait]
pub trait PositionProvider: Debug + Send + Sync {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, PositionError>;
}

pub type SuccessCallback = Box<dyn FnOnce(Position) + Send>;
pub type ErrorCallback = Box<dyn FnOnce(PositionError) + Send>;

/// Callback flavour of [`PositionProvider::current_position`]. The lookup always runs on a spawned
/// task, so neither callback fires before this function has returned. Exactly one of the callbacks
/// is invoked; errors are dropped when no error callback is given.
pub fn get_current_position(
    provider: Arc<dyn PositionProvider>,
    on_success: SuccessCallback,
    on_error: Option<ErrorCallback>,
    options: PositionOptions,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match provider.current_position(&options).await {
            Ok(position) => on_success(position),
            Err(err) => {
                if let Some(on_error) = on_error {
                    on_error(err);
                }
            }
        }
    })
}
