pub struct Config {
    /// Skips the startup banner.
    pub no_banner: bool,
    /// Output verbosity.
    ///
    /// 0 prints everything, 1 drops decorations, 2 prints only the results.
    pub quiet: u8,
    /// Prints results as JSON instead of the terminal tree.
    pub json: bool,
}
