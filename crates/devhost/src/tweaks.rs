//! Sample tweakables

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use livetweak_core::{
    tweak, tweak_action, tweak_actions, tweak_hook, ActionOwner, TweakCell, TweakEnum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TweakEnum)]
pub enum Quality {
    Low,
    Medium,
    High,
}

#[tweak(label = "Player Speed", category = "Movement", min = 0, max = 100)]
pub static PLAYER_SPEED: TweakCell<f32> = TweakCell::new(5.0);

#[tweak(label = "Volume", category = "Audio", min = 0, max = 1, on_changed = "on_volume_changed")]
pub static MASTER_VOLUME: TweakCell<f32> = TweakCell::new(0.8);

#[tweak(label = "Debug Mode")]
pub static DEBUG_ENABLED: TweakCell<bool> = TweakCell::new(false);

#[tweak(label = "Render Quality", category = "Graphics")]
pub static QUALITY: TweakCell<Quality> = TweakCell::new(Quality::High);

#[tweak(label = "Build Tag", category = "Info")]
pub static BUILD_TAG: TweakCell<String> = TweakCell::read_only(String::new());

#[tweak(label = "Key Bindings", category = "Keys")]
pub static KEY_BINDINGS: LazyLock<TweakCell<HashMap<String, String>>> = LazyLock::new(|| {
    TweakCell::new(HashMap::from([
        ("Jump".to_string(), "Space".to_string()),
        ("Crouch".to_string(), "Ctrl".to_string()),
        ("Shoot".to_string(), "LeftMouse".to_string()),
    ]))
});

#[tweak(label = "Key Bindings Index", category = "Keys", on_changed = "on_index_changed")]
pub static KEY_BINDINGS_INDEX: LazyLock<TweakCell<HashMap<i32, i32>>> =
    LazyLock::new(|| TweakCell::new(HashMap::from([(1, 10), (2, 20), (3, 30)])));

#[tweak(label = "Key Bindings Enable", category = "Keys")]
pub static KEY_BINDINGS_ENABLE: LazyLock<TweakCell<HashMap<String, bool>>> = LazyLock::new(|| {
    TweakCell::new(HashMap::from([
        ("Key1".to_string(), true),
        ("Key2".to_string(), false),
        ("Key3".to_string(), true),
    ]))
});

#[tweak(label = "Spawn Waves", category = "Gameplay")]
pub static SPAWN_WAVES: LazyLock<TweakCell<Vec<i32>>> =
    LazyLock::new(|| TweakCell::new(vec![5, 10, 20]));

static VOLUME_CHANGES: AtomicU32 = AtomicU32::new(0);

#[tweak_hook]
fn on_volume_changed() {
    let n = VOLUME_CHANGES.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!("Volume changed to: {} ({} changes)", MASTER_VOLUME.get(), n);
}

#[tweak_hook(name = "on_index_changed")]
fn on_index_key_reverted(member: &str, key: &i32, map: &HashMap<i32, i32>) {
    tracing::info!("{}: key {} reverted to {:?}", member, key, map.get(key));
}

#[tweak_hook(name = "on_index_changed")]
fn on_index_replaced(member: &str, map: &HashMap<i32, i32>) {
    tracing::info!("{}: {} entries", member, map.len());
}

#[tweak_action(label = "Reset Movement", category = "Movement")]
fn reset_movement() {
    PLAYER_SPEED.set(5.0);
}

#[tweak_action(label = "Fail On Purpose", category = "Debug")]
fn fail_on_purpose() -> Result<(), String> {
    Err("This action always fails".to_string())
}

/// Counts respawns; shared with the `&self` actions below
pub struct Respawner {
    count: AtomicU32,
}

static RESPAWNER: LazyLock<Arc<Respawner>> = LazyLock::new(|| {
    Arc::new(Respawner {
        count: AtomicU32::new(0),
    })
});

impl ActionOwner for Respawner {
    fn current() -> Option<Arc<Self>> {
        Some(RESPAWNER.clone())
    }
}

#[tweak_actions(category = "Gameplay")]
impl Respawner {
    #[tweak_action(label = "Respawn Player")]
    fn respawn(&self) {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Respawned ({} total)", n);
    }

    #[tweak_action(label = "Panic")]
    fn explode() {
        panic!("Respawner exploded");
    }
}
