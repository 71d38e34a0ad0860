//! Application state and composition.

use std::sync::Arc;

use jojo_domain::{CreationRules, SpecialArmorPolicy};

use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, PasswordHasherPort, RandomPort, SessionPort, UserRepo,
};
use crate::use_cases::{AuthUseCases, CharacterCrud, RollDice};

/// Main application state.
///
/// Holds the repositories, the session port and all use cases.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub sessions: Arc<dyn SessionPort>,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
pub struct Repositories {
    pub user: Arc<dyn UserRepo>,
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub auth: AuthUseCases,
    pub characters: CharacterCrud,
    pub roll: RollDice,
}

/// Adapters the use cases are built from.
pub struct Services {
    pub passwords: Arc<dyn PasswordHasherPort>,
    pub sessions: Arc<dyn SessionPort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

impl App {
    pub fn new(
        repositories: Repositories,
        services: Services,
        rules: CreationRules,
        special_armor_policy: SpecialArmorPolicy,
    ) -> Self {
        let use_cases = UseCases {
            auth: AuthUseCases::new(
                repositories.user.clone(),
                services.passwords,
                services.sessions.clone(),
                services.clock.clone(),
            ),
            characters: CharacterCrud::new(
                repositories.character.clone(),
                services.clock,
                rules,
                special_armor_policy,
            ),
            roll: RollDice::new(services.random),
        };

        Self {
            repositories,
            sessions: services.sessions,
            use_cases,
        }
    }
}
