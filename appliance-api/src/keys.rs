//! Well-known item keys and enum values
//!
//! The subset of the appliance API namespace that the state engine
//! interprets, so inference and gating are not stringly-typed at call sites.

/// Well-known item keys
pub mod key {
    /// Sentinel key published by the engine for connectivity changes
    pub const CONNECTED: &str = "connected";

    /// Current operation phase of the appliance
    pub const OPERATION_STATE: &str = "BSH.Common.Status.OperationState";
    /// Power setting
    pub const POWER_STATE: &str = "BSH.Common.Setting.PowerState";
    /// True while the appliance is being operated at the physical unit
    pub const LOCAL_CONTROL_ACTIVE: &str = "BSH.Common.Status.LocalControlActive";
    /// Whether remote control is currently enabled on the appliance
    pub const REMOTE_CONTROL_ACTIVE: &str = "BSH.Common.Status.RemoteControlActive";
    /// Whether remotely starting a program is currently allowed
    pub const REMOTE_START_ALLOWED: &str = "BSH.Common.Status.RemoteControlStartAllowed";

    /// Currently selected program
    pub const SELECTED_PROGRAM: &str = "BSH.Common.Root.SelectedProgram";
    /// Currently active program
    pub const ACTIVE_PROGRAM: &str = "BSH.Common.Root.ActiveProgram";
}

/// Well-known enum values for the operation state key
pub mod operation_state {
    pub const INACTIVE: &str = "BSH.Common.EnumType.OperationState.Inactive";
    pub const READY: &str = "BSH.Common.EnumType.OperationState.Ready";
    pub const RUN: &str = "BSH.Common.EnumType.OperationState.Run";
    pub const DELAYED_START: &str = "BSH.Common.EnumType.OperationState.DelayedStart";
    pub const PAUSE: &str = "BSH.Common.EnumType.OperationState.Pause";
    pub const ACTION_REQUIRED: &str = "BSH.Common.EnumType.OperationState.ActionRequired";
    pub const FINISHED: &str = "BSH.Common.EnumType.OperationState.Finished";
    pub const ERROR: &str = "BSH.Common.EnumType.OperationState.Error";
    pub const ABORTING: &str = "BSH.Common.EnumType.OperationState.Aborting";
}

/// Well-known enum values for the power setting key
pub mod power_state {
    pub const ON: &str = "BSH.Common.EnumType.PowerState.On";
    pub const OFF: &str = "BSH.Common.EnumType.PowerState.Off";
    pub const STANDBY: &str = "BSH.Common.EnumType.PowerState.Standby";
}
