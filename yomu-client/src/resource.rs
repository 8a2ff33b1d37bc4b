use crate::ApiError;

/// Fetch generation counter
///
/// Handed out by [`Resource::restart`]; a resolution presenting an epoch
/// other than the current one is ignored instead of clobbering state.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Epoch(u64);

/// Where a fetched value currently stands
#[derive(Debug)]
pub enum ResourceState<T> {
    Pending,
    Loaded(T),
    Failed(ApiError),
}

/// One remotely-fetched value and its state machine
///
/// Exactly one fetch is issued per generation: on mount, and again whenever
/// the identity key behind the value changes (auth token or resource id).
/// `Loaded` never goes back to `Pending` within a generation; only a new
/// generation starts pending again.
#[derive(Debug)]
pub struct Resource<T> {
    epoch: Epoch,
    state: ResourceState<T>,
}

impl<T> Resource<T> {
    /// Starts pending; nothing can resolve until [`Resource::restart`] has
    /// handed out an epoch
    pub fn new() -> Resource<T> {
        Resource {
            epoch: Epoch(0),
            state: ResourceState::Pending,
        }
    }

    /// Opens a new fetch generation and goes back to pending
    ///
    /// The returned epoch must accompany the outcome of the fetch the caller
    /// is about to issue.
    pub fn restart(&mut self) -> Epoch {
        self.epoch.0 += 1;
        self.state = ResourceState::Pending;
        self.epoch
    }

    /// Applies a fetch outcome, unless it is from an outdated generation
    ///
    /// Returns whether the outcome was applied.
    pub fn resolve(&mut self, epoch: Epoch, outcome: Result<T, ApiError>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(?epoch, current=?self.epoch, "dropping stale fetch result");
            return false;
        }
        self.state = match outcome {
            Ok(value) => ResourceState::Loaded(value),
            Err(err) => ResourceState::Failed(err),
        };
        true
    }

    /// Writes a value that did not come from a fetch (optimistic local state)
    pub fn insert(&mut self, value: T) {
        self.state = ResourceState::Loaded(value);
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            ResourceState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match &self.state {
            ResourceState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ResourceState::Pending)
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Resource<T> {
        Resource::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn resolve_applies_current_generation() {
        let mut res = Resource::new();
        let epoch = res.restart();
        assert!(res.is_pending());

        assert!(res.resolve(epoch, Ok(vec![1, 2])));
        assert_eq!(res.value(), Some(&vec![1, 2]));
    }

    #[test]
    fn resolve_records_failure() {
        let mut res: Resource<Vec<i32>> = Resource::new();
        let epoch = res.restart();

        assert!(res.resolve(epoch, Err(ApiError::Status(StatusCode::NOT_FOUND))));
        assert!(res.value().is_none());
        match res.failure() {
            Some(ApiError::Status(status)) => assert_eq!(*status, StatusCode::NOT_FOUND),
            other => panic!("expected recorded status failure, got {:?}", other),
        }
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let mut res = Resource::new();
        let first = res.restart();
        let second = res.restart();

        assert!(!res.resolve(first, Ok("old")));
        assert!(res.is_pending());

        assert!(res.resolve(second, Ok("new")));
        assert_eq!(res.value(), Some(&"new"));
    }

    #[test]
    fn stale_resolution_after_load_is_dropped() {
        let mut res = Resource::new();
        let first = res.restart();
        let second = res.restart();
        assert!(res.resolve(second, Ok("new")));

        // the old generation lands last and must not win
        assert!(!res.resolve(first, Ok("old")));
        assert_eq!(res.value(), Some(&"new"));
    }

    #[test]
    fn nothing_resolves_before_first_restart() {
        let mut res: Resource<()> = Resource::new();
        let epoch = res.restart();
        let mut other: Resource<()> = Resource::new();

        assert!(!other.resolve(epoch, Ok(())));
        assert!(other.is_pending());
    }

    #[test]
    fn insert_overwrites_but_fetch_still_resolves() {
        let mut res = Resource::new();
        let epoch = res.restart();

        res.insert(vec!["local"]);
        assert_eq!(res.value(), Some(&vec!["local"]));

        // the in-flight fetch of the same generation still lands afterwards
        assert!(res.resolve(epoch, Ok(vec!["server"])));
        assert_eq!(res.value(), Some(&vec!["server"]));
    }
}
