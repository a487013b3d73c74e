// Discord commands module.
// Each feature gets its own command file.

pub mod strikes;

// Bot presence management
pub mod presence;
