mod tables;

pub use self::tables::{
    demo_outcomes as print_demo_outcomes, session_summary as print_session_summary,
    trace_summary as print_trace_summary, windows as print_window_report,
};
