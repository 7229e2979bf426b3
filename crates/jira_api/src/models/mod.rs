mod de;
mod issue;
mod issue_type;
mod server_info;
mod transition;
mod worklog;

pub use issue::{CreatedIssue, Issue, IssueCreateRequest, IssueFields};
pub use issue_type::IssueType;
pub use server_info::ServerInfo;
pub use transition::{Transition, TransitionDestination, TransitionList};
pub(crate) use transition::{TransitionExecuteRequest, TransitionIdRef};
pub use worklog::{Worklog, WorklogCreate};
