use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::engine::adventure::AdventureState;
use crate::session::result::{ProgressEntry, ProgressRecord};
use crate::store::backend::StorageBackend;
use crate::store::schema::{
    ADVENTURE_KEY, ALL_KEYS, AVATAR_KEY, Avatar, AvatarColor, Character, DEFAULT_AVATAR_ID,
    ENDLESS_HIGH_SCORE_KEY, EXPORT_VERSION, ExportData, NAMESPACE, PROGRESS_KEY, REWARDS_KEY,
    Reward,
};

const BACKUP_SUFFIX: &str = ".bak";

/// Typed access to every persisted entity. Reads never fail: missing or
/// malformed data comes back as the entity's default.
pub struct GameStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> GameStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn key(name: &str) -> String {
        format!("{NAMESPACE}{name}")
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let key = Self::key(name);
        let content = match self.backend.get(&key) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read stored data, using default");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "malformed stored data, using default");
                None
            }
        }
    }

    /// Read ahead of a write. Backend errors propagate so a failed read never
    /// turns into an overwrite. Malformed text is copied to `<key>.bak` first,
    /// then treated as absent.
    fn load_checked<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let key = Self::key(name);
        let Some(content) = self.backend.get(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let backup = format!("{key}{BACKUP_SUFFIX}");
                self.backend.set(&backup, &content)?;
                warn!(
                    key = %key,
                    backup = %backup,
                    error = %e,
                    "malformed stored data backed up, starting fresh"
                );
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.backend.set(&Self::key(name), &json)
    }

    pub fn load_progress(&self) -> Vec<ProgressRecord> {
        self.load(PROGRESS_KEY).unwrap_or_default()
    }

    /// Append a finished session. The id is the creation time in epoch
    /// milliseconds, bumped past the newest existing id.
    pub fn append_progress(&self, entry: ProgressEntry) -> Result<ProgressRecord> {
        let mut history: Vec<ProgressRecord> =
            self.load_checked(PROGRESS_KEY)?.unwrap_or_default();
        let now = Utc::now();
        let mut id = now.timestamp_millis();
        if let Some(last) = history.last().and_then(|r| r.id.parse::<i64>().ok())
            && id <= last
        {
            id = last + 1;
        }
        let record = ProgressRecord::from_entry(entry, id.to_string(), now);
        history.push(record.clone());
        self.save(PROGRESS_KEY, &history)?;
        Ok(record)
    }

    pub fn load_avatar(&self) -> Option<Avatar> {
        self.load(AVATAR_KEY)
    }

    /// Replace the avatar. Fills in the singleton id and stamps the update time.
    pub fn save_avatar(&self, avatar: &Avatar) -> Result<Avatar> {
        let mut avatar = avatar.clone();
        if avatar.id.is_empty() {
            avatar.id = DEFAULT_AVATAR_ID.to_string();
        }
        avatar.updated_date = Utc::now();
        self.save(AVATAR_KEY, &avatar)?;
        Ok(avatar)
    }

    /// Pick a character and color, keeping any stars already earned.
    pub fn customize_avatar(&self, character: Character, color: AvatarColor) -> Result<Avatar> {
        let current: Option<Avatar> = self.load_checked(AVATAR_KEY)?;
        let avatar = Avatar {
            id: current
                .as_ref()
                .map(|a| a.id.clone())
                .unwrap_or_default(),
            selected_character: character,
            selected_color: color,
            total_stars: current.map_or(0, |a| a.total_stars),
            updated_date: Utc::now(),
        };
        self.save_avatar(&avatar)
    }

    /// Add stars to the avatar. Without an avatar there is nothing to credit.
    pub fn award_stars(&self, stars: u32) -> Result<Option<Avatar>> {
        let Some(mut avatar) = self.load_checked::<Avatar>(AVATAR_KEY)? else {
            return Ok(None);
        };
        avatar.total_stars = avatar.total_stars.saturating_add(stars);
        self.save_avatar(&avatar).map(Some)
    }

    pub fn load_rewards(&self) -> Vec<Reward> {
        self.load(REWARDS_KEY).unwrap_or_default()
    }

    /// Returns the reward when newly added, None when its id is already held.
    pub fn add_reward(&self, reward: Reward) -> Result<Option<Reward>> {
        let mut rewards: Vec<Reward> = self.load_checked(REWARDS_KEY)?.unwrap_or_default();
        if rewards.iter().any(|r| r.id == reward.id) {
            return Ok(None);
        }
        rewards.push(reward.clone());
        self.save(REWARDS_KEY, &rewards)?;
        Ok(Some(reward))
    }

    pub fn load_adventure(&self) -> AdventureState {
        let mut state: AdventureState = self.load(ADVENTURE_KEY).unwrap_or_default();
        state.normalize();
        state
    }

    pub fn save_adventure(&self, state: &AdventureState) -> Result<()> {
        self.save(ADVENTURE_KEY, state)
    }

    /// Apply `change` to the stored ledger and write it back.
    pub fn update_adventure(
        &self,
        change: impl FnOnce(&mut AdventureState),
    ) -> Result<AdventureState> {
        let mut state: AdventureState = self.load_checked(ADVENTURE_KEY)?.unwrap_or_default();
        state.normalize();
        change(&mut state);
        self.save_adventure(&state)?;
        Ok(state)
    }

    pub fn load_endless_high_score(&self) -> u32 {
        self.load(ENDLESS_HIGH_SCORE_KEY).unwrap_or_default()
    }

    /// Keep the best endless score. Returns the high score after the update.
    pub fn save_endless_high_score(&self, score: u32) -> Result<u32> {
        let best: u32 = self
            .load_checked(ENDLESS_HIGH_SCORE_KEY)?
            .unwrap_or_default();
        if score <= best {
            return Ok(best);
        }
        self.save(ENDLESS_HIGH_SCORE_KEY, &score)?;
        Ok(score)
    }

    pub fn export_all(&self) -> ExportData {
        ExportData {
            numquest_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            progress: self.load_progress(),
            avatar: self.load_avatar(),
            rewards: self.load_rewards(),
            adventure: self.load_adventure(),
            endless_high_score: self.load_endless_high_score(),
        }
    }

    /// Replace everything with an export. All entities are serialized before
    /// the first write; a failed write puts the previous values back.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.numquest_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.numquest_export_version,
                EXPORT_VERSION
            );
        }

        let avatar = match &data.avatar {
            Some(avatar) => Some(serde_json::to_string_pretty(avatar)?),
            None => None,
        };
        let entries: Vec<(&str, Option<String>)> = vec![
            (PROGRESS_KEY, Some(serde_json::to_string_pretty(&data.progress)?)),
            (AVATAR_KEY, avatar),
            (REWARDS_KEY, Some(serde_json::to_string_pretty(&data.rewards)?)),
            (ADVENTURE_KEY, Some(serde_json::to_string_pretty(&data.adventure)?)),
            (
                ENDLESS_HIGH_SCORE_KEY,
                Some(serde_json::to_string_pretty(&data.endless_high_score)?),
            ),
        ];

        let mut previous: Vec<(String, Option<String>)> = Vec::new();
        for name in ALL_KEYS {
            let key = Self::key(name);
            let value = self.backend.get(&key)?;
            previous.push((key, value));
        }

        for (name, value) in &entries {
            let key = Self::key(name);
            let result = match value {
                Some(json) => self.backend.set(&key, json),
                None => self.backend.remove(&key),
            };
            if let Err(e) = result {
                for (key, old) in &previous {
                    let _ = match old {
                        Some(json) => self.backend.set(key, json),
                        None => self.backend.remove(key),
                    };
                }
                bail!("Import failed writing {key}: {e}");
            }
        }
        Ok(())
    }
}
