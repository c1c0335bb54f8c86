//! Wire types for appliance descriptors, programs, commands, and scopes

use item_store::Item;
use serde::{Deserialize, Serialize};

/// Appliance descriptor returned by the home appliances endpoint
///
/// `connected` is authoritative: descriptor reads double as a connectivity
/// side channel for the state engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceInfo {
    /// Home appliance identifier
    pub haid: String,
    /// Friendly name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Vendor item number
    pub vib: String,
    /// Appliance class (e.g. "Oven", "Washer", "Dishwasher")
    pub appliance_type: String,
    /// Whether the appliance is currently reachable from the cloud
    pub connected: bool,
}

/// A program with its option items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Program key (e.g. "LaundryCare.Washer.Program.Cotton")
    pub key: String,
    /// Option items (keys in the option namespace)
    #[serde(default)]
    pub options: Vec<Item>,
}

impl Program {
    /// Create a program with no options
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            options: Vec::new(),
        }
    }

    /// Add an option item
    pub fn with_option(mut self, option: Item) -> Self {
        self.options.push(option);
        self
    }
}

/// A command supported by an appliance (e.g. pause/resume, open door)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Command key (e.g. "BSH.Common.Command.PauseProgram")
    pub key: String,
    /// Human-readable command name
    #[serde(default)]
    pub name: Option<String>,
}

/// Authorization scope categories granted to the client
///
/// Scopes are held by the transport layer; the engine queries them via
/// `ApplianceClient::has_scope` but never mutates the grant set. Each scope
/// also exists in an appliance-class-specific form ("Oven-Control") that the
/// capability gate consults before falling back to the generic grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Read status and event data
    Monitor,
    /// Read and write settings
    Settings,
    /// Start, stop, and adjust programs and commands
    Control,
    /// Physically identify an appliance
    IdentifyAppliance,
}

impl Scope {
    /// The generic scope name as granted by the authorization server
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monitor => "Monitor",
            Self::Settings => "Settings",
            Self::Control => "Control",
            Self::IdentifyAppliance => "IdentifyAppliance",
        }
    }

    /// The appliance-class-specific scope name, e.g. `Oven-Control`
    pub fn for_appliance_type(&self, appliance_type: &str) -> String {
        format!("{}-{}", appliance_type, self.as_str())
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_names() {
        assert_eq!(Scope::Control.as_str(), "Control");
        assert_eq!(Scope::Control.for_appliance_type("Oven"), "Oven-Control");
    }

    #[test]
    fn test_program_builder() {
        let program = Program::new("LaundryCare.Washer.Program.Cotton")
            .with_option(Item::new("LaundryCare.Washer.Option.Temperature", json!("GC40")));
        assert_eq!(program.options.len(), 1);
    }
}
