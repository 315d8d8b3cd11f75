//! Composition root for the Ratchet server.

use std::sync::Arc;

use ratchet_core::{
    AtomicIdGenerator, DefinitionStore, MemoryApplicationRepository, SystemClock, WorkflowService,
};

use crate::config::ServerConfig;

/// The running server: configuration plus the wired orchestration service.
pub struct RatchetServer {
    config: ServerConfig,
    service: WorkflowService,
}

impl RatchetServer {
    /// Wire the in-memory store, repositories, id generator, and clock into
    /// a workflow service.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(DefinitionStore::new());
        let applications = Arc::new(MemoryApplicationRepository::new());
        let service = WorkflowService::new(
            applications,
            store,
            Arc::new(AtomicIdGenerator::new()),
            Arc::new(SystemClock),
            config.default_creator.clone(),
        );
        Self { config, service }
    }

    /// The orchestration service.
    pub fn service(&self) -> &WorkflowService {
        &self.service
    }

    /// The configuration the server was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
