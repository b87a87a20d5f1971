pub mod remote_url;

/// The only remote castor talks to
pub const DEFAULT_REMOTE: &str = "origin";

/// Transports accepted in `scheme://` remote URLs
pub const REMOTE_SCHEMES: phf::Set<&'static str> = phf::phf_set! {
    "ssh",
    "git",
    "http",
    "https",
    "git+ssh",
    "ssh+git",
    "file",
};

pub const SCHEME_URL_REGEX: &str =
    r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://(?:[^@/]*@)?(?P<host>[^/:]*)(?::\d*)?(?P<path>/.*)?$";
pub const SCP_URL_REGEX: &str = r"^(?:[^@/:]+@)?(?P<host>[^/:]+):(?P<path>.*)$";
