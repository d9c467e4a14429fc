use crate::domain::{Coordinates, Position, PositionError, PositionOptions};
use crate::geolocation::PositionProvider;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider returning a fixed sequence of results, counting how often it was asked.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<Position, PositionError>>>,
    options: Mutex<Vec<PositionOptions>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<Position, PositionError>>) -> Self {
        ScriptedProvider {
            results: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(vec![Ok(Position::new(Coordinates::new(latitude, longitude), Utc::now()))])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received_options(&self) -> Vec<PositionOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl PositionProvider for ScriptedProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, PositionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.options.lock().unwrap().push(options.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PositionError::PositionUnavailable("no scripted result left".to_string())))
    }
}
