fn main() -> std::process::ExitCode {
    jira_time_logger_lib::run()
}
