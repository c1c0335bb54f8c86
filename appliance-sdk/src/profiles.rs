//! Appliance class profiles
//!
//! The cloud API exposes the same endpoint surface for every appliance
//! class, but only some classes actually run programs. Polling the program
//! endpoints on a fridge wastes quota and lengthens every
//! resynchronization, so the engine is configured per class.

/// Appliance classes that run selectable programs
const PROGRAM_CLASSES: &[&str] = &[
    "Oven",
    "Washer",
    "Dryer",
    "WasherDryer",
    "Dishwasher",
    "CoffeeMaker",
    "Hood",
    "CleaningRobot",
    "CookProcessor",
];

/// Whether an appliance class supports selected/active programs
pub fn supports_programs(appliance_type: &str) -> bool {
    PROGRAM_CLASSES.contains(&appliance_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_classes() {
        assert!(supports_programs("Washer"));
        assert!(supports_programs("Oven"));
        assert!(!supports_programs("FridgeFreezer"));
        assert!(!supports_programs("WineCooler"));
    }
}
