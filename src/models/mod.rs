pub mod issue;
pub mod site;
