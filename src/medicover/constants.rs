// Medicover mobile service
pub const DEFAULT_API_URL: &str = "https://api.medicover.pl/MOB/MOB.WebServices/Service.svc/json/";

// the service rejects clients that do not look like a browser
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.121 Safari/537.36";

// values the mobile app sends on login
pub const APPLICATION_ID: &str = "NewMOB";
pub const PLATFORM: &str = "Android";
pub const OS_VERSION: &str = "7.1";

// operation names
pub const OP_LOGIN: &str = "MobileLogin_StrongTypeInput";
pub const OP_REGIONS: &str = "LoadRegions";
pub const OP_SPECIALTIES: &str = "LoadSpecialties_Cached";
pub const OP_CLINICS: &str = "LoadClinics_Cached";
pub const OP_DOCTORS: &str = "LoadDoctors_Cached";
pub const OP_FREE_SLOTS: &str = "GetFreeSlots";
