/// Default guard on application depth. Low enough that runaway recursion
/// trips the guard before it exhausts a 2 MiB stack, the default for spawned
/// threads, even in unoptimised builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Nesting depth at which evaluation fails with a recursion error.
    /// `None` leaves recursion bounded only by the host stack.
    pub max_depth: Option<usize>,
    pub dump_tokens: bool,
    pub dump_tree: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            dump_tokens: false,
            dump_tree: false,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: impl Into<Option<usize>>) -> Self {
        self.max_depth = max_depth.into();
        self
    }

    pub fn with_dump_tokens(mut self, dump_tokens: bool) -> Self {
        self.dump_tokens = dump_tokens;
        self
    }

    pub fn with_dump_tree(mut self, dump_tree: bool) -> Self {
        self.dump_tree = dump_tree;
        self
    }
}
