pub mod branch_name;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|^@$|^-|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// What `git rev-parse --abbrev-ref HEAD` prints when HEAD is detached
pub const DETACHED_HEAD: &str = "HEAD";
