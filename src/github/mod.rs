// GitHub REST access: executor + config, 403 triage, pagination, enrichment.

pub mod client;
pub mod rate_limit;
pub mod stargazers;
pub mod users;

#[cfg(test)]
pub mod testing;
