pub mod cover_letter;
pub mod resume;

pub use cover_letter::CoverLetterData;
pub use resume::{Education, Experience, PersonalInfo, Project, ResumeData, Skill};
