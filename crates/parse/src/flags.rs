use bitflags::bitflags;

bitflags! {
    /// Options recognized by document and directory ingestion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// Fill in a missing name or summary from the companion desktop entry.
        const CHECK_DESKTOP_FILE = 1 << 0;
        /// Link documents to the records whose file lists install them.
        const SEARCH_UNINTERNALIZED_FILELIST = 1 << 1;
        /// Resolve filesystem paths below the configured root.
        const USE_ROOTDIR = 1 << 2;
        /// Leave attribute writes staged; the caller internalizes later.
        const NO_INTERNALIZE = 1 << 3;
    }
}
