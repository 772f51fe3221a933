//! # Neuro-Agents
//!
//! Generation workflows for Neuro-Architect.
//!
//! ## Architecture
//!
//! Three workflows share one generation client:
//!
//! 1. **Profile**: brain parameters → full structured profile (baseline)
//! 2. **Chat**: multi-turn conversation grounded in the baseline profile
//! 3. **Scenario**: one-shot projection of the profile into a situation
//!
//! ## Flow
//!
//! ```text
//! BrainParameters
//!     ↓ [PromptCompiler]
//! [GenerationClient] → backend (Gemini) → raw text
//!     ↓ [SchemaContract]
//! Profile
//!     ├─→ [SessionManager]  ← user turns
//!     └─→ [ScenarioEngine]  ← preset or custom scenario
//! ```
//!
//! Every structured response is validated in full before it becomes
//! visible; a partial or malformed payload is never exposed.

pub mod agent;
pub mod client;
pub mod contract;
pub mod gemini;
pub mod orchestrator;
pub mod prompts;
pub mod scenario;
pub mod session;
pub mod view;

pub use agent::*;
pub use client::*;
pub use contract::*;
pub use gemini::*;
pub use orchestrator::*;
pub use prompts::*;
pub use scenario::*;
pub use session::*;
pub use view::*;
