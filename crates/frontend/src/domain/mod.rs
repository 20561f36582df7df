pub mod a001_spider;
pub mod a002_task;
pub mod a003_node;
pub mod a004_git;
pub mod a005_ai_chat;
