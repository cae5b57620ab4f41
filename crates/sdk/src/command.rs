//! Command and result shapes for the dispatcher

use serde::{Deserialize, Serialize};

use crate::kind::EntryKind;
use crate::RawValue;

/// Command type understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweakCommandType {
    SetValue,
    RevertValue,
    SetDictionaryValue,
    RevertDictionaryValue,
    SetCollectionValue,
    RevertCollectionValue,
    InvokeAction,
}

impl TweakCommandType {
    /// Entry kind this command operates on
    pub fn target_kind(&self) -> EntryKind {
        match self {
            Self::SetValue | Self::RevertValue => EntryKind::Value,
            Self::SetDictionaryValue | Self::RevertDictionaryValue => EntryKind::Dictionary,
            Self::SetCollectionValue | Self::RevertCollectionValue => EntryKind::Collection,
            Self::InvokeAction => EntryKind::Action,
        }
    }
}

/// A single command against one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweakCommand {
    #[serde(rename = "type")]
    pub command_type: TweakCommandType,
    pub entry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    /// Dictionary key, used by keyed revert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl TweakCommand {
    pub fn new(command_type: TweakCommandType, entry_id: impl Into<String>) -> Self {
        Self {
            command_type,
            entry_id: entry_id.into(),
            value: None,
            key: None,
        }
    }

    /// Attach a value (builder pattern)
    pub fn with_value(mut self, value: impl Into<RawValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a dictionary key (builder pattern)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn set_value(entry_id: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self::new(TweakCommandType::SetValue, entry_id).with_value(value)
    }

    pub fn revert_value(entry_id: impl Into<String>) -> Self {
        Self::new(TweakCommandType::RevertValue, entry_id)
    }

    pub fn set_dictionary(entry_id: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self::new(TweakCommandType::SetDictionaryValue, entry_id).with_value(value)
    }

    pub fn revert_dictionary(entry_id: impl Into<String>, key: Option<String>) -> Self {
        let mut cmd = Self::new(TweakCommandType::RevertDictionaryValue, entry_id);
        cmd.key = key;
        cmd
    }

    pub fn set_collection(entry_id: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self::new(TweakCommandType::SetCollectionValue, entry_id).with_value(value)
    }

    pub fn revert_collection(entry_id: impl Into<String>) -> Self {
        Self::new(TweakCommandType::RevertCollectionValue, entry_id)
    }

    pub fn invoke(entry_id: impl Into<String>) -> Self {
        Self::new(TweakCommandType::InvokeAction, entry_id)
    }
}

/// Outcome of dispatching a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweakCommandResult {
    pub ok: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<RawValue>,
}

impl TweakCommandResult {
    pub fn success(message: impl Into<String>, new_value: Option<RawValue>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            new_value,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            new_value: None,
        }
    }
}
