//! livetweak Proc Macros
//!
//! This crate provides the declarative markers for livetweak:
//!
//! - `#[tweak]` - Mark a static `TweakCell` as a tweakable member
//! - `#[tweak_action]` - Mark a zero-argument function as an action
//! - `#[tweak_actions]` - Collect `#[tweak_action]` methods of an impl block
//! - `#[tweak_hook]` - Register a change hook
//! - `#[derive(TweakEnum)]` - Use a fieldless enum as a tweak value
//!
//! Every marker expands to an `inventory` submission, so the registry finds
//! marked items without a central list.
//!
//! # Example
//!
//! ```ignore
//! use livetweak_core::{tweak, tweak_action, tweak_hook, TweakCell, TweakEnum};
//!
//! #[derive(Clone, Copy, TweakEnum)]
//! enum Quality {
//!     Low,
//!     High,
//! }
//!
//! #[tweak(label = "Master Volume", category = "Audio", min = 0, max = 1, on_changed = "on_volume")]
//! static VOLUME: TweakCell<f32> = TweakCell::new(0.8);
//!
//! #[tweak(category = "Graphics")]
//! static QUALITY: TweakCell<Quality> = TweakCell::new(Quality::High);
//!
//! #[tweak_hook]
//! fn on_volume(value: &f32) {
//!     tracing::info!("volume is now {}", value);
//! }
//!
//! #[tweak_action(label = "Reset Audio", category = "Audio")]
//! fn reset_audio() {
//!     VOLUME.set(0.8);
//! }
//! ```
//!
//! # Owners and Names
//!
//! The owner of a marked item defaults to the module path it is declared in
//! (for `#[tweak_actions]`, the module path plus the type name). The name
//! defaults to the item's identifier. The entry id is `owner:name`. Hooks are
//! resolved on the member's owner, so a member and its hook normally live in
//! the same module.

mod action;
mod hook;
mod parse;
mod tweak;
mod tweak_enum;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemFn, ItemImpl, ItemStatic};

/// Attribute macro marking a static as a tweakable member
///
/// The static must hold a `TweakCell<T>` or a `LazyLock<TweakCell<T>>`, where
/// `T` is a scalar, a `#[derive(TweakEnum)]` enum, a `Vec`/`VecDeque` of
/// scalars, or a `HashMap`/`BTreeMap`/`serde_json::Map`.
///
/// # Arguments
///
/// - `label = "..."` - Display label (default: the member name)
/// - `category = "..."` - Category (default: the configured default category)
/// - `min = <number>`, `max = <number>` - Inclusive bounds for numeric scalars
/// - `on_changed = "..."` - Name of a `#[tweak_hook]` on the same owner
/// - `owner = "..."` - Owner name (default: `module_path!()`)
/// - `name = "..."` - Member name (default: the static's identifier)
///
/// # Example
///
/// ```ignore
/// #[tweak(label = "Move Speed", category = "Player", min = 0, max = 100)]
/// static SPEED: TweakCell<f32> = TweakCell::new(5.0);
///
/// #[tweak(category = "Input")]
/// static BINDINGS: LazyLock<TweakCell<HashMap<String, String>>> =
///     LazyLock::new(|| TweakCell::new(HashMap::new()));
/// ```
///
/// # Generated Code
///
/// - The original static, unchanged
/// - `__livetweak_member_{IDENT}()` - Erases the static for the registry
/// - An `inventory` submission carrying the marker metadata
#[proc_macro_attribute]
pub fn tweak(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse::parse_args::<parse::TweakArgs>(attr.into()) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };
    let item = parse_macro_input!(item as ItemStatic);
    tweak::generate_tweak(args, item).into()
}

/// Attribute macro marking a zero-argument function as an action
///
/// The function may return `()` or `Result<(), E>` where `E: Display`.
///
/// # Arguments
///
/// - `label = "..."`, `category = "..."`
/// - `owner = "..."`, `name = "..."`
///
/// Inside an impl block annotated with `#[tweak_actions]`, the attribute may
/// also mark associated functions and `&self` methods.
#[proc_macro_attribute]
pub fn tweak_action(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse::parse_args::<parse::ActionArgs>(attr.into()) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };
    let func = parse_macro_input!(item as ItemFn);
    action::generate_action(args, func).into()
}

/// Attribute macro for impl blocks containing `#[tweak_action]` methods
///
/// `&self` methods need the type to implement `ActionOwner`, which supplies
/// the instance (a current singleton, else a freshly constructed value).
///
/// # Arguments
///
/// - `owner = "..."` - Owner name (default: module path plus the type name)
/// - `category = "..."` - Category for actions that do not name one
///
/// # Example
///
/// ```ignore
/// struct Spawner;
///
/// impl ActionOwner for Spawner {
///     fn construct() -> Option<Self> {
///         Some(Spawner)
///     }
/// }
///
/// #[tweak_actions(category = "Debug")]
/// impl Spawner {
///     #[tweak_action(label = "Spawn Wave")]
///     fn spawn_wave(&self) { /* ... */ }
///
///     #[tweak_action]
///     fn clear_all() -> Result<(), String> { Ok(()) }
/// }
/// ```
#[proc_macro_attribute]
pub fn tweak_actions(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse::parse_args::<parse::ActionsArgs>(attr.into()) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };
    let item = parse_macro_input!(item as ItemImpl);
    action::generate_actions(args, item).into()
}

/// Attribute macro registering a change hook
///
/// The parameter list picks the hook shape:
///
/// - `fn()`
/// - `fn(value: &V)`
/// - `fn(member: &str, value: &V)`
/// - `fn(member: &str, key: &K, value: &V)` (keyed dictionary reverts only)
///
/// For dictionaries and collections `V` is the whole container type.
///
/// # Arguments
///
/// - `owner = "..."` - Owner name (default: `module_path!()`)
/// - `name = "..."` - Hook name (default: the function name)
#[proc_macro_attribute]
pub fn tweak_hook(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse::parse_args::<parse::HookArgs>(attr.into()) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };
    let func = parse_macro_input!(item as ItemFn);
    hook::generate_hook(args, func).into()
}

/// Derive macro for fieldless enums used as tweak values
///
/// Implements `TweakEnum`, `TweakScalar` (kind `Enum`, case-insensitive
/// name matching) and `TweakShape`. The enum must also be `Clone`.
///
/// # Attributes
///
/// - `#[tweak_enum(type_name = "...")]` on the enum - Reported type name
/// - `#[tweak_enum(rename = "...")]` on a variant - Name used on the wire
#[proc_macro_derive(TweakEnum, attributes(tweak_enum))]
pub fn derive_tweak_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    tweak_enum::derive_tweak_enum(input).into()
}
