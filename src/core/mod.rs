//! 核心编排层：错误类型、查询阶段、过程事件、查询编排器

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use error::RouterError;
pub use events::RouterEvent;
pub use orchestrator::{
    create_llm_from_config, Orchestrator, QueryOutcome, MATCH_THRESHOLD, NO_MATCH_MESSAGE,
    SKILL_LOAD_FAILED_MESSAGE,
};
pub use state::QueryPhase;
