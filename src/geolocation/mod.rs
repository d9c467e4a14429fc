mod device;
mod provider;
#[cfg(test)]
pub(crate) mod testing;

pub use device::DevicePositionProvider;
pub use provider::{ErrorCallback, PositionProvider, SuccessCallback, get_current_position};
