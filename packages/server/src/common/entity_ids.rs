//! Typed id aliases for every persisted entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

pub struct AdminUser;
pub struct Program;
pub struct Participant;
pub struct Document;
pub struct Course;
pub struct Quiz;
pub struct QuizQuestion;
pub struct Test;
pub struct TestQuestion;
pub struct Video;
pub struct Certification;
pub struct MemberDocument;
pub struct VendorSubmission;
pub struct Donation;
pub struct FundDistribution;
pub struct VaultItem;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type AdminUserId = Id<AdminUser>;
pub type ProgramId = Id<Program>;
pub type ParticipantId = Id<Participant>;
pub type DocumentId = Id<Document>;
pub type CourseId = Id<Course>;
pub type QuizId = Id<Quiz>;
pub type QuizQuestionId = Id<QuizQuestion>;
pub type TestId = Id<Test>;
pub type TestQuestionId = Id<TestQuestion>;
pub type VideoId = Id<Video>;
pub type CertificationId = Id<Certification>;
pub type MemberDocumentId = Id<MemberDocument>;
pub type VendorId = Id<VendorSubmission>;
pub type DonationId = Id<Donation>;
pub type DistributionId = Id<FundDistribution>;
pub type VaultItemId = Id<VaultItem>;
