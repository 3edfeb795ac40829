mod widgets;

mod landing;
pub use landing::Landing;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod student_dashboard;
pub use student_dashboard::StudentDashboard;

mod report_injury;
pub use report_injury::ReportInjury;

mod injury_detail;
pub use injury_detail::InjuryDetail;

mod practitioner_dashboard;
pub use practitioner_dashboard::PractitionerDashboard;

mod admin_dashboard;
pub use admin_dashboard::AdminDashboard;

mod not_found;
pub use not_found::NotFound;
