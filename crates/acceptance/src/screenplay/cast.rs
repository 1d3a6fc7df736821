//! Per-scenario actor registry

use std::collections::HashMap;
use std::sync::Arc;

use super::Actor;
use crate::driver::Driver;

/// The actors of one scenario. Each persona name maps to exactly one actor,
/// created on first mention; a new scenario gets a new cast.
pub struct Cast {
    driver: Arc<dyn Driver>,
    actors: HashMap<String, Actor>,
}

impl Cast {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            actors: HashMap::new(),
        }
    }

    /// The actor playing `name`, created on first use
    pub fn actor(&mut self, name: &str) -> &mut Actor {
        let driver = &self.driver;
        self.actors
            .entry(name.to_string())
            .or_insert_with(|| Actor::new(name, driver.clone()))
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DomainDriver;
    use crate::library::SignIn;

    #[tokio::test]
    async fn test_actor_is_memoized_per_name() {
        let mut cast = Cast::new(Arc::new(DomainDriver::new()));

        let _ = cast.actor("Bob").attempts_to(&[&SignIn]).await;
        cast.actor("Sue");

        assert_eq!(cast.len(), 2);
        assert!(cast
            .actor("Bob")
            .expects_last_error_to_contain("account not found")
            .is_ok());
        assert!(cast.actor("Sue").abilities().last_error().is_none());
    }
}
