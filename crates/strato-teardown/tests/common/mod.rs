//! In-memory control plane shared by the teardown integration tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strato_cloud::{
    CloudError, CloudServices, ListFilter, Operation, OperationStatus, PatchFields, PollConfig,
    Resource, ResourceApi, ResourceKind, ResourceRef, SyncStatus, TaskApi,
};
use strato_teardown::{Orchestrator, ProgressEvent, ProgressSink, TeardownOptions};

#[derive(Default)]
struct State {
    resources: Vec<ResourceRef>,
    calls: Vec<String>,
    next_task: u32,
    issue_tasks: bool,
    fail_delete: HashSet<String>,
    fail_get: HashSet<String>,
    fail_list: HashSet<ResourceKind>,
    keep_after_delete: HashSet<String>,
    fail_patch: HashSet<String>,
    vanish_before_delete: HashSet<String>,
    failing_resources: HashSet<String>,
    failed_tasks: HashSet<String>,
}

/// Fake control plane; deletions take effect immediately
#[derive(Clone)]
pub struct FakeCloud {
    state: Arc<Mutex<State>>,
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        let state = State {
            issue_tasks: true,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// A VPC with nothing inside
    pub fn with_vpc(vpc_id: &str) -> Self {
        let cloud = Self::new();
        cloud.add(ResourceRef::new(ResourceKind::Vpc, vpc_id));
        cloud
    }

    pub fn add(&self, resource: ResourceRef) {
        self.state.lock().unwrap().resources.push(resource);
    }

    /// Add a resource scoped to `vpc_id`
    pub fn add_in_vpc(&self, kind: ResourceKind, id: &str, vpc_id: &str) {
        self.add(ResourceRef::new(kind, id).with_attribute("vpc_id", json!(vpc_id)));
    }

    /// Add a resource owned by `parent_id`
    pub fn add_child(&self, kind: ResourceKind, id: &str, parent_id: &str) {
        self.add(ResourceRef::new(kind, id).with_parent(parent_id));
    }

    /// Deletes succeed without returning a task
    pub fn without_tasks(&self) {
        self.state.lock().unwrap().issue_tasks = false;
    }

    pub fn fail_delete(&self, id: &str) {
        self.state.lock().unwrap().fail_delete.insert(id.to_string());
    }

    pub fn fail_get(&self, id: &str) {
        self.state.lock().unwrap().fail_get.insert(id.to_string());
    }

    pub fn fail_list(&self, kind: ResourceKind) {
        self.state.lock().unwrap().fail_list.insert(kind);
    }

    pub fn fail_patch(&self, id: &str) {
        self.state.lock().unwrap().fail_patch.insert(id.to_string());
    }

    /// Tasks issued for `id` end in the failed state
    pub fn fail_tasks_of(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_resources
            .insert(id.to_string());
    }

    /// The resource disappears on its own right before its delete call
    pub fn vanish_before_delete(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .vanish_before_delete
            .insert(id.to_string());
    }

    /// The delete call succeeds but the resource stays
    pub fn keep_after_delete(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .keep_after_delete
            .insert(id.to_string());
    }

    pub fn exists(&self, id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .resources
            .iter()
            .any(|r| r.id == id)
    }

    pub fn find(&self, id: &str) -> Option<ResourceRef> {
        self.state
            .lock()
            .unwrap()
            .resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Every call in order, e.g. "list instance vpc_id=vpc-1"
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Delete and patch calls only
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("delete ") || c.starts_with("patch "))
            .collect()
    }

    pub fn services(&self) -> CloudServices {
        CloudServices::new(Arc::new(self.handle(ResourceKind::Vpc)), |kind| {
            Arc::new(self.handle(kind)) as Arc<dyn ResourceApi>
        })
    }

    pub fn orchestrator(&self, progress: Arc<dyn ProgressSink>) -> Orchestrator {
        Orchestrator::new(self.services(), options()).with_progress(progress)
    }

    fn handle(&self, kind: ResourceKind) -> FakeKind {
        FakeKind {
            kind,
            state: self.state.clone(),
        }
    }
}

#[allow(dead_code)]
pub fn options() -> TeardownOptions {
    TeardownOptions {
        poll: PollConfig::new(Duration::from_secs(5), Duration::from_millis(10)),
        verify: true,
    }
}

/// One resource kind of a [`FakeCloud`]; also answers task lookups
struct FakeKind {
    kind: ResourceKind,
    state: Arc<Mutex<State>>,
}

impl FakeKind {
    fn issue_task(state: &mut State, id: &str) -> Option<Operation> {
        if !state.issue_tasks {
            return None;
        }
        state.next_task += 1;
        let task_id = format!("task-{}", state.next_task);
        if state.failing_resources.contains(id) {
            state.failed_tasks.insert(task_id.clone());
        }
        Some(Operation::new(task_id, OperationStatus::Pending).with_resource(id))
    }
}

#[async_trait]
impl ResourceApi for FakeKind {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list(&self, filter: &ListFilter) -> strato_cloud::Result<Vec<ResourceRef>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list {} {}", self.kind, filter));
        if state.fail_list.contains(&self.kind) {
            return Err(CloudError::Api("service unavailable".to_string()));
        }
        Ok(state
            .resources
            .iter()
            .filter(|r| r.kind == self.kind && filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> strato_cloud::Result<Resource> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get {} [{}]", self.kind, id));
        if state.fail_get.contains(id) {
            return Err(CloudError::Transport("connection reset".to_string()));
        }
        state
            .resources
            .iter()
            .find(|r| r.kind == self.kind && r.id == id)
            .map(|r| Resource::new(r.clone()).with_status(SyncStatus::Active))
            .ok_or_else(|| CloudError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            })
    }

    async fn delete(&self, id: &str) -> strato_cloud::Result<Option<Operation>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {} [{}]", self.kind, id));
        if state.fail_delete.contains(id) {
            return Err(CloudError::Api(format!("{} is still in use", id)));
        }
        if state.vanish_before_delete.contains(id) {
            let kind = self.kind;
            state.resources.retain(|r| !(r.kind == kind && r.id == id));
        }
        if !state.resources.iter().any(|r| r.kind == self.kind && r.id == id) {
            return Err(CloudError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        if !state.keep_after_delete.contains(id) {
            let kind = self.kind;
            state.resources.retain(|r| !(r.kind == kind && r.id == id));
        }
        Ok(Self::issue_task(&mut state, id))
    }

    async fn patch(
        &self,
        id: &str,
        fields: &PatchFields,
    ) -> strato_cloud::Result<Option<Operation>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("patch {} [{}]", self.kind, id));
        if state.fail_patch.contains(id) {
            return Err(CloudError::Api(format!("{} is locked", id)));
        }
        let kind = self.kind;
        let resource = state
            .resources
            .iter_mut()
            .find(|r| r.kind == kind && r.id == id)
            .ok_or_else(|| CloudError::NotFound {
                kind,
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            resource.attributes.insert(key.clone(), value.clone());
        }
        Ok(Self::issue_task(&mut state, id))
    }
}

#[async_trait]
impl TaskApi for FakeKind {
    async fn get_task(&self, id: &str) -> strato_cloud::Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("task {}", id));
        if !id.starts_with("task-") {
            return Err(CloudError::TaskNotFound(id.to_string()));
        }
        if state.failed_tasks.contains(id) {
            return Ok(Operation::new(id, OperationStatus::Failed));
        }
        Ok(Operation::new(id, OperationStatus::Complete))
    }
}

/// Collects progress events
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

#[allow(dead_code)]
impl RecordingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(|e| e.to_string()).collect()
    }

    /// Lines starting with `prefix`
    pub fn lines_starting(&self, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with(prefix))
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
