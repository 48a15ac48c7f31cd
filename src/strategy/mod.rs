//! Claim strategy
//!
//! Contains the claim cycle and its supporting pieces.
//!
//! ## Architecture
//!
//! - `claimer` - one contract invocation per attempt
//! - `cycle` - balance, claim-until-success, countdown
//! - `countdown` / `timing` - wait arithmetic and cancellable sleeps

// =============================================================================
// Claim attempt
// =============================================================================

pub mod claimer;

pub use claimer::{ClaimAttempt, ContractClaimer};

// =============================================================================
// Cycle state machine
// =============================================================================

pub mod countdown;
pub mod cycle;
pub mod timing;

pub use countdown::{Countdown, CountdownTick, TimeBreakdown};
pub use cycle::{CycleController, CyclePhase, CycleReport, CycleSettings, CycleState};
pub use timing::{cancellable, hours_to_millis, pause, ClaimTiming};
