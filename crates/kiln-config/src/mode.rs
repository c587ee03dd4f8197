//! Mode flags derived from the invocation arguments.

use std::ffi::OsStr;

/// Pipeline mode switches.
///
/// `--dev` turns on source maps and turns off minification and image
/// optimization. `--sync` enables live-reload broadcasting. Production is
/// always the negation of development, so only two bits are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    dev: bool,
    sync: bool,
}

impl ModeFlags {
    pub const DEV_FLAG: &'static str = "--dev";
    pub const SYNC_FLAG: &'static str = "--sync";

    pub fn new(dev: bool, sync: bool) -> Self {
        Self { dev, sync }
    }

    /// Derive flags from raw arguments.
    ///
    /// Only literal `--dev` and `--sync` are recognized; everything else is
    /// ignored, so this never fails.
    ///
    /// ```
    /// use kiln_config::ModeFlags;
    ///
    /// let mode = ModeFlags::from_args(["kiln", "watch", "--sync", "--whatever"]);
    /// assert!(mode.is_prod());
    /// assert!(mode.is_sync());
    /// ```
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut mode = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == Self::DEV_FLAG {
                mode.dev = true;
            } else if arg == Self::SYNC_FLAG {
                mode.sync = true;
            }
        }
        mode
    }

    /// Combine two flag sets, keeping every switch that is on in either.
    pub fn union(self, other: Self) -> Self {
        Self {
            dev: self.dev || other.dev,
            sync: self.sync || other.sync,
        }
    }

    pub fn is_dev(&self) -> bool {
        self.dev
    }

    pub fn is_prod(&self) -> bool {
        !self.dev
    }

    pub fn is_sync(&self) -> bool {
        self.sync
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match (self.dev, self.sync) {
            (true, true) => "development + sync",
            (true, false) => "development",
            (false, true) => "production + sync",
            (false, false) => "production",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_without_sync() {
        let mode = ModeFlags::from_args(["kiln", "build"]);
        assert!(mode.is_prod());
        assert!(!mode.is_dev());
        assert!(!mode.is_sync());
    }

    #[test]
    fn dev_flag_flips_production() {
        let mode = ModeFlags::from_args(["kiln", "build", "--dev"]);
        assert!(mode.is_dev());
        assert!(!mode.is_prod());
        assert!(!mode.is_sync());
    }

    #[test]
    fn sync_is_independent_of_dev() {
        let both = ModeFlags::from_args(["--sync", "--dev"]);
        assert!(both.is_dev() && both.is_sync());

        let sync_only = ModeFlags::from_args(["--sync"]);
        assert!(sync_only.is_prod() && sync_only.is_sync());
    }

    #[test]
    fn unknown_and_lookalike_flags_are_ignored() {
        let mode = ModeFlags::from_args(["--development", "--dev=true", "-d", "--syncing"]);
        assert_eq!(mode, ModeFlags::default());
    }

    #[test]
    fn prod_is_always_negation_of_dev() {
        for dev in [false, true] {
            for sync in [false, true] {
                let mode = ModeFlags::new(dev, sync);
                assert_eq!(mode.is_prod(), !mode.is_dev());
            }
        }
    }

    #[test]
    fn union_keeps_enabled_switches() {
        let mode = ModeFlags::new(true, false).union(ModeFlags::new(false, true));
        assert!(mode.is_dev());
        assert!(mode.is_sync());
        assert_eq!(mode.label(), "development + sync");
    }
}
