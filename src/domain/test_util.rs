use anyhow::anyhow;

/// Whether an in-memory driven port should behave like a reachable store or simulate an outage
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Fails the port call when the fake is simulating an outage
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("simulated outage: the store is unreachable")),
        }
    }
}

/// Stand-in for one driving port method. Records the arguments of every call and hands back
/// a preset result, so API handlers can be tested without the real services.
///
/// * [Args] is what gets recorded per call, usually a tuple of the interesting parameters
/// * [Ret] is the method's return type
pub struct FakeImplementation<Args, Ret> {
    recorded_calls: Vec<Args>,
    preset_result: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            recorded_calls: Vec::new(),
            preset_result: None,
        }
    }

    pub fn save_arguments(&mut self, arguments: Args) {
        self.recorded_calls.push(arguments);
    }

    /// Arguments of every call so far, oldest first
    pub fn calls(&self) -> &[Args] {
        &self.recorded_calls
    }
}

impl<Args, Ret: Clone> FakeImplementation<Args, Ret> {
    pub fn set_return_value(&mut self, return_value: Ret) {
        self.preset_result = Some(return_value);
    }

    /// Hands back a copy of the preset result. Panics if the test never set one.
    pub fn return_value(&self) -> Ret {
        self.preset_result
            .clone()
            .unwrap_or_else(|| panic!("A faked driving port was called before its result was set"))
    }
}
