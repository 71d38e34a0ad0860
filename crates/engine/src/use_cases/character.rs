//! Character creation and owner-scoped CRUD.
//!
//! Creation runs the Stand through the stat budget, the remaining payload
//! through the action dot budget and cap, then derives max stress and
//! special armor from the Stand's durability. Nothing is written unless
//! every check passes.

use std::sync::Arc;

use serde_json::{Map, Value};

use jojo_domain::{
    derive_durability_effects, validate_action_dots, validate_stand_stats, Action, Character,
    CharacterId, CharacterProfile, CreationRules, DomainError, PlayStateUpdate,
    ProposedStandStats, SpecialArmorPolicy, Stand, UserId,
};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

use super::validation::{normalize_optional, require_max_length};

pub const MAX_CHARACTER_NAME_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found")]
    NotFound,
    /// The character exists but belongs to someone else.
    #[error("Unauthorized")]
    Forbidden,
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// A proposed Stand: free-text identity plus unvalidated grades.
#[derive(Debug, Clone, Default)]
pub struct NewStand {
    pub name: Option<String>,
    pub ability: Option<String>,
    pub stats: ProposedStandStats,
}

/// Everything submitted to create a character.
#[derive(Debug, Clone, Default)]
pub struct NewCharacter {
    pub profile: CharacterProfile,
    pub stand: Option<NewStand>,
    /// Remaining top-level payload keys, in submission order.
    pub actions: Map<String, Value>,
}

pub struct CharacterCrud {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    rules: CreationRules,
    special_armor_policy: SpecialArmorPolicy,
}

impl CharacterCrud {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        rules: CreationRules,
        special_armor_policy: SpecialArmorPolicy,
    ) -> Self {
        Self {
            characters,
            clock,
            rules,
            special_armor_policy,
        }
    }

    pub async fn create(
        &self,
        user_id: UserId,
        input: NewCharacter,
    ) -> Result<Character, CharacterError> {
        let stand = match input.stand {
            Some(proposed) => {
                let stats = validate_stand_stats(&proposed.stats, &self.rules).map_err(|e| {
                    tracing::info!(user_id = %user_id, error = %e, "Stand rejected");
                    DomainError::from(e)
                })?;
                Some(
                    Stand::new(stats)
                        .with_name(normalize_optional(proposed.name))
                        .with_ability(normalize_optional(proposed.ability)),
                )
            }
            None => None,
        };

        let actions = validate_action_dots(&input.actions, &self.rules).map_err(|e| {
            tracing::info!(user_id = %user_id, error = %e, "Action dots rejected");
            DomainError::from(e)
        })?;
        for key in input.actions.keys() {
            if key.parse::<Action>().is_err() {
                tracing::debug!(key = %key, "Ignoring unrecognized creation field");
            }
        }

        require_max_length(
            input.profile.name.trim(),
            MAX_CHARACTER_NAME_LEN,
            "Character name",
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;

        let effects = derive_durability_effects(
            stand.as_ref().map(|s| s.stats.durability),
            &self.rules,
        );
        let profile = CharacterProfile {
            name: input.profile.name,
            origin: normalize_optional(input.profile.origin),
            vice: normalize_optional(input.profile.vice),
            vice_purveyor: normalize_optional(input.profile.vice_purveyor),
            friends: normalize_optional(input.profile.friends),
            rivals: normalize_optional(input.profile.rivals),
        };
        let character = Character::new(
            user_id,
            profile,
            actions,
            stand,
            effects,
            self.clock.now(),
        )?;

        self.characters.create(&character).await?;
        tracing::info!(
            user_id = %user_id,
            character_id = %character.id,
            max_stress = character.max_stress,
            special_armor = character.special_armor,
            "Character created"
        );
        Ok(character)
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<Character>, CharacterError> {
        Ok(self.characters.list_for_user(user_id).await?)
    }

    /// Load a character the caller owns. Missing is reported before foreign.
    pub async fn get(
        &self,
        user_id: UserId,
        character_id: CharacterId,
    ) -> Result<Character, CharacterError> {
        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(CharacterError::NotFound)?;

        if !character.is_owned_by(user_id) {
            tracing::info!(
                user_id = %user_id,
                character_id = %character_id,
                "Access to another user's character refused"
            );
            return Err(CharacterError::Forbidden);
        }
        Ok(character)
    }

    pub async fn update(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        update: PlayStateUpdate,
    ) -> Result<Character, CharacterError> {
        let character = self.get(user_id, character_id).await?;
        if update.is_empty() {
            tracing::debug!(character_id = %character_id, "Empty play state update");
        }
        character.check_play_state(&update, self.special_armor_policy, &self.rules)?;

        let character = self
            .characters
            .update_play_state(character_id, &update, self.clock.now())
            .await
            .map_err(missing_as_not_found)?;
        tracing::debug!(character_id = %character_id, "Play state updated");
        Ok(character)
    }

    pub async fn delete(
        &self,
        user_id: UserId,
        character_id: CharacterId,
    ) -> Result<(), CharacterError> {
        self.get(user_id, character_id).await?;
        self.characters
            .delete(character_id)
            .await
            .map_err(missing_as_not_found)?;
        tracing::info!(user_id = %user_id, character_id = %character_id, "Character deleted");
        Ok(())
    }
}

/// A row deleted between the ownership check and the write is a 404.
fn missing_as_not_found(e: RepoError) -> CharacterError {
    if e.is_not_found() {
        CharacterError::NotFound
    } else {
        CharacterError::Repo(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockCharacterRepo;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use jojo_domain::{ActionDots, Grade, StandStats, StatValidationError};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn crud(repo: MockCharacterRepo, policy: SpecialArmorPolicy) -> CharacterCrud {
        CharacterCrud::new(
            Arc::new(repo),
            Arc::new(FixedClock(now())),
            CreationRules::default(),
            policy,
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn stand(grades: Value) -> NewStand {
        NewStand {
            name: Some("Star Platinum".to_string()),
            ability: Some(" Stops time ".to_string()),
            stats: serde_json::from_value(grades).expect("stand grades"),
        }
    }

    fn input(stand: Option<NewStand>, actions: Value) -> NewCharacter {
        NewCharacter {
            profile: CharacterProfile {
                name: "Jotaro Kujo".to_string(),
                origin: Some("Tokyo".to_string()),
                vice: Some("  ".to_string()),
                ..Default::default()
            },
            stand,
            actions: object(actions),
        }
    }

    fn existing(owner: UserId, durability: Grade) -> Character {
        let stats = StandStats {
            power: Grade::C,
            speed: Grade::C,
            range: Grade::D,
            durability,
            precision: Grade::F,
            potential: Grade::F,
        };
        let rules = CreationRules::default();
        Character::new(
            owner,
            CharacterProfile {
                name: "Jotaro Kujo".to_string(),
                ..Default::default()
            },
            ActionDots::default(),
            Some(Stand::new(stats)),
            derive_durability_effects(Some(durability), &rules),
            now(),
        )
        .expect("valid character")
    }

    #[tokio::test]
    async fn create_persists_validated_character_with_derived_values() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_create()
            .withf(|c| {
                c.stress == 0
                    && c.max_stress == 13
                    && c.special_armor == 4
                    && c.actions.skirmish == 2
                    && c.actions.wreck == 2
            })
            .times(1)
            .returning(|_| Ok(()));

        let owner = UserId::new();
        let character = crud(repo, SpecialArmorPolicy::Overwrite)
            .create(
                owner,
                input(
                    Some(stand(json!({
                        "power": "D", "speed": "D", "range": "F",
                        "durability": "S", "precision": "D", "potential": "F"
                    }))),
                    json!({"skirmish": 2, "wreck": 2, "study": 1, "playbook": "Stand User"}),
                ),
            )
            .await
            .expect("created");

        assert_eq!(character.user_id, owner);
        assert_eq!(character.created_at, now());
        assert_eq!(character.vice, None);
        let stand = character.stand.expect("stand kept");
        assert_eq!(stand.stats.durability, Grade::S);
        assert_eq!(stand.ability.as_deref(), Some("Stops time"));
    }

    #[tokio::test]
    async fn create_without_stand_uses_base_values() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_create().times(1).returning(|_| Ok(()));

        let character = crud(repo, SpecialArmorPolicy::Overwrite)
            .create(UserId::new(), input(None, json!({"hunt": 1})))
            .await
            .expect("created");
        assert_eq!(character.max_stress, 9);
        assert_eq!(character.special_armor, 0);
        assert!(character.stand.is_none());
    }

    #[tokio::test]
    async fn over_budget_stand_persists_nothing() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_create().never();

        let err = crud(repo, SpecialArmorPolicy::Overwrite)
            .create(
                UserId::new(),
                input(
                    Some(stand(json!({
                        "power": "A", "speed": "A", "range": "A",
                        "durability": "F", "precision": "F", "potential": "F"
                    }))),
                    json!({}),
                ),
            )
            .await
            .expect_err("11 points");

        assert!(matches!(
            err,
            CharacterError::Invalid(DomainError::StandStats(
                StatValidationError::BudgetExceeded { total: 12, limit: 10 }
            ))
        ));
    }

    #[tokio::test]
    async fn invalid_grade_is_reported_by_field() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_create().never();

        let err = crud(repo, SpecialArmorPolicy::Overwrite)
            .create(
                UserId::new(),
                input(Some(stand(json!({"power": "X"}))), json!({})),
            )
            .await
            .expect_err("bad grade");
        assert_eq!(
            err.to_string(),
            "Invalid grade for power: must be S, A, B, C, D, or F"
        );
    }

    #[tokio::test]
    async fn action_violations_persist_nothing() {
        for actions in [
            json!({"hunt": 2, "study": 2, "survey": 2, "tinker": 2}),
            json!({"hunt": 3}),
            json!({"hunt": 1, "notes": 5}),
        ] {
            let mut repo = MockCharacterRepo::new();
            repo.expect_create().never();
            let result = crud(repo, SpecialArmorPolicy::Overwrite)
                .create(UserId::new(), input(None, actions.clone()))
                .await;
            assert!(
                matches!(
                    result,
                    Err(CharacterError::Invalid(DomainError::ActionDots(_)))
                ),
                "{actions}"
            );
        }
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_create().never();
        let mut new_character = input(None, json!({}));
        new_character.profile.name = "   ".to_string();

        let err = crud(repo, SpecialArmorPolicy::Overwrite)
            .create(UserId::new(), new_character)
            .await
            .expect_err("blank name");
        assert!(matches!(
            err,
            CharacterError::Invalid(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn get_reports_missing_before_foreign() {
        let owner = UserId::new();
        let theirs = existing(owner, Grade::B);
        let theirs_id = theirs.id;

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |id| {
            Ok((id == theirs.id).then(|| theirs.clone()))
        });
        let crud = crud(repo, SpecialArmorPolicy::Overwrite);

        assert!(matches!(
            crud.get(UserId::new(), CharacterId::new()).await,
            Err(CharacterError::NotFound)
        ));
        assert!(matches!(
            crud.get(UserId::new(), theirs_id).await,
            Err(CharacterError::Forbidden)
        ));
        assert!(crud.get(owner, theirs_id).await.is_ok());
    }

    #[tokio::test]
    async fn update_writes_only_supplied_fields() {
        let owner = UserId::new();
        let stored = existing(owner, Grade::B);
        let id = stored.id;
        let mut written = stored.clone();
        written.stress = 5;
        written.updated_at = now();

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update_play_state()
            .withf(move |target, update, at| {
                *target == id
                    && update.stress == Some(5)
                    && update.harm.is_none()
                    && update.special_armor.is_none()
                    && *at == now()
            })
            .times(1)
            .returning(move |_, _, _| Ok(written.clone()));

        let updated = crud(repo, SpecialArmorPolicy::Overwrite)
            .update(
                owner,
                id,
                PlayStateUpdate {
                    stress: Some(5),
                    ..Default::default()
                },
            )
            .await
            .expect("updated");
        assert_eq!(updated.stress, 5);
        assert_eq!(updated.updated_at, now());
    }

    #[tokio::test]
    async fn update_of_concurrently_deleted_character_is_not_found() {
        let owner = UserId::new();
        let stored = existing(owner, Grade::C);
        let id = stored.id;

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update_play_state()
            .times(1)
            .returning(|id, _, _| Err(RepoError::not_found("Character", id)));

        let err = crud(repo, SpecialArmorPolicy::Overwrite)
            .update(
                owner,
                id,
                PlayStateUpdate {
                    stress: Some(2),
                    ..Default::default()
                },
            )
            .await
            .expect_err("deleted underneath");
        assert!(matches!(err, CharacterError::NotFound));
    }

    #[tokio::test]
    async fn locked_policy_rejects_divergent_special_armor() {
        let owner = UserId::new();
        let stored = existing(owner, Grade::B);
        let id = stored.id;

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update_play_state().never();

        let err = crud(repo, SpecialArmorPolicy::Locked)
            .update(
                owner,
                id,
                PlayStateUpdate {
                    special_armor: Some(9),
                    ..Default::default()
                },
            )
            .await
            .expect_err("locked");
        assert!(matches!(
            err,
            CharacterError::Invalid(DomainError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn update_of_foreign_character_is_forbidden() {
        let stored = existing(UserId::new(), Grade::C);
        let id = stored.id;

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update_play_state().never();

        let err = crud(repo, SpecialArmorPolicy::Overwrite)
            .update(UserId::new(), id, PlayStateUpdate::default())
            .await
            .expect_err("forbidden");
        assert!(matches!(err, CharacterError::Forbidden));
    }

    #[tokio::test]
    async fn delete_checks_ownership_first() {
        let owner = UserId::new();
        let stored = existing(owner, Grade::C);
        let id = stored.id;

        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(stored.clone())));
        repo.expect_delete().times(1).returning(|_| Ok(()));
        let crud = crud(repo, SpecialArmorPolicy::Overwrite);

        assert!(matches!(
            crud.delete(UserId::new(), id).await,
            Err(CharacterError::Forbidden)
        ));
        crud.delete(owner, id).await.expect("deleted");
    }

    #[tokio::test]
    async fn list_returns_owner_characters() {
        let owner = UserId::new();
        let mut first = existing(owner, Grade::C);
        first.created_at = now() - Duration::days(1);
        let second = existing(owner, Grade::A);

        let mut repo = MockCharacterRepo::new();
        repo.expect_list_for_user()
            .withf(move |id| *id == owner)
            .returning(move |_| Ok(vec![first.clone(), second.clone()]));

        let listed = crud(repo, SpecialArmorPolicy::Overwrite)
            .list(owner)
            .await
            .expect("listed");
        assert_eq!(listed.len(), 2);
    }
}
