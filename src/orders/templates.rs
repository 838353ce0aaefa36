//! Customer-facing order messages
//!
//! These are echoed verbatim; wording changes need business sign-off.

pub const NOT_FOUND: &str =
    "თქვენი შეკვეთის შესახებ ინფორმაციის დასაზუსტებლად გაკავშირებთ ოპერატორთან🫶";

pub const IN_PROCESS: &str =
    "თქვენი შეკვეთა მუშავდება📦✨. დეტალური ინფორმაციისთვის გაკავშირებთ ოპერატორს 🚀";

pub const DELIVERED: &str =
    "თქვენი შეკვეთა გაცემულია 📦✅ დამატებითი ინფორმაციის დასაზუსტებლად გაკავშირებთ ოპერატორს 🫶";

pub const CANCELLED: &str =
    "თქვენი შეკვეთა გაუქმებულია 📦❌ დამატებითი ინფორმაციის დასაზუსტებლად გაკავშირებთ ოპერატორს 🫶";

/// Prefix of the tool result that carries a scripted reply
pub const VERBATIM_PREFIX: &str =
    "Respond with this message verbatim (do not change the wording): ";

pub const PASS_THROUGH_PREFIX: &str = "Order status information: ";

pub const TRANSFER_PREFIX: &str = "Transferring to operator: ";

const GPOST_URL: &str = "https://www.gpost.ge/";
const FEDEX_PHONE: &str = "032 291 02 20";

pub fn ready_for_pickup(branch: &str) -> String {
    format!(
        "თქვენი შეკვეთა გამზადებულია {branch} ფილიალში 📦✨. შეკვეთის გასატანად თან გქონდეთ პირადობის დამადასტურებელი მოწმობა ფიზიკური ან ელექტრონული სახით 🚀"
    )
}

pub fn fast_delivery(deadline: &str) -> String {
    format!(
        "თქვენ გაფორმებული გაქვთ სწრაფი მიწოდება. შეკვეთას მიიღებთ {deadline} დღის განმავლობაში. შეტყობინებას მიიღებთ SMS-ის სახით, მიწოდებამდე დაგიკავშირდებათ კურიერი 📦 🚀"
    )
}

pub fn scheduled_delivery(window: &str) -> String {
    format!(
        "თქვენ გაფორმებული გაქვთ დაგეგმილი მიწოდება. შეკვეთას მიიღებთ {window} თქვენს მიერ შერჩეულ ვადაში. შეტყობინებას მიიღებთ SMS-ის სახით, მიწოდებამდე დაგიკავშირდებათ კურიერი 📦 🚀"
    )
}

/// Standard delivery via the national postal service
pub fn standard_postal(deadline: &str, tracking_code: &str, transit_note: &str) -> String {
    format!(
        "თქვენ გაფორმებული გაქვთ სტანდარტული მიწოდება. შეკვეთის მიიღების ბოლო ვადა გახლავთ {deadline}. მიღების ვადებზე დეტალური ინფორმაციისთვის შეგიძლიათ დაუკავშირდეთ საქართველოს ფოსტას ან თრექინგ კოდის საშუალებით გადაამოწმოთ მათ ვებ-გვერდზე: {GPOST_URL}. შეკვეთის თრექინგ კოდია: {tracking_code}. გაითვალისწინეთ, რომ სტანდარტული მიწოდების ვადა {transit_note} 📦 🚀"
    )
}

/// Standard delivery via the courier partner
pub fn standard_courier(deadline: &str, tracking_code: &str, transit_note: &str) -> String {
    format!(
        "თქვენ გაფორმებული გაქვთ სტანდარტული მიწოდება. შეკვეთის მიიღების ბოლო ვადა გახლავთ {deadline}. მიღების ვადებზე დეტალური ინფორმაციისთვის შეგიძლიათ დაუკავშირდეთ FedEx-სს ნომერზე {FEDEX_PHONE}. თქვენი შეკვეთის თრექინგ კოდია: {tracking_code}. გაითვალისწინეთ, რომ სტანდარტული მიწოდების ვადა {transit_note} 📦 🚀"
    )
}

pub const TRANSIT_REGIONS: &str = "საქართველოს მასშტაბით 3-6 სამუშაო დღეა";
pub const TRANSIT_CAPITAL: &str = "თბილისში 2-5 სამუშაო დღეა";
