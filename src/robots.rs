use std::collections::HashMap;
use url::Url;

/// Parsed robots.txt rules.
#[derive(Debug, Clone, Default)]
pub struct RobotsTxt {
    /// Rules per user-agent (lowercase)
    rules: HashMap<String, AgentRules>,

    /// Rules for `*`
    default_rules: AgentRules,
}

#[derive(Debug, Clone, Default)]
struct AgentRules {
    disallow: Vec<String>,
    allow: Vec<String>,
}

impl RobotsTxt {
    /// Parse robots.txt content.
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules = AgentRules::default();
        let mut saw_directive = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new record
                    if saw_directive {
                        robots.store(&current_agents, current_rules);
                        current_rules = AgentRules::default();
                        current_agents.clear();
                        saw_directive = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" => {
                    saw_directive = true;
                    if !value.is_empty() {
                        current_rules.disallow.push(value.to_string());
                    }
                }
                "allow" => {
                    saw_directive = true;
                    if !value.is_empty() {
                        current_rules.allow.push(value.to_string());
                    }
                }
                _ => {}
            }
        }
        robots.store(&current_agents, current_rules);

        robots
    }

    fn store(&mut self, agents: &[String], rules: AgentRules) {
        for agent in agents {
            if agent == "*" {
                self.default_rules = rules.clone();
            } else {
                self.rules.insert(agent.clone(), rules.clone());
            }
        }
    }

    /// Check if a path is allowed for a user-agent.
    ///
    /// Standard exclusion semantics: among all Allow/Disallow rules whose
    /// prefix matches the path, the longest one wins; Allow wins ties.
    pub fn is_allowed(&self, user_agent: &str, path: &str) -> bool {
        let agent_lower = user_agent.to_lowercase();

        let rules = self
            .rules
            .get(&agent_lower)
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|(k, _)| agent_lower.contains(k.as_str()))
                    .map(|(_, v)| v)
            })
            .unwrap_or(&self.default_rules);

        let longest_allow = rules
            .allow
            .iter()
            .filter(|rule| path.starts_with(rule.as_str()))
            .map(|rule| rule.len())
            .max();
        let longest_disallow = rules
            .disallow
            .iter()
            .filter(|rule| path.starts_with(rule.as_str()))
            .map(|rule| rule.len())
            .max();

        match (longest_allow, longest_disallow) {
            (Some(allow), Some(disallow)) => allow >= disallow,
            (None, Some(_)) => false,
            _ => true,
        }
    }
}

/// Answers "may this agent fetch URL X?" for the crawl loop.
///
/// Holds the policy fetched once at crawl start; an unreachable or missing
/// robots.txt means allow-all, as does disabling the gate entirely.
#[derive(Debug)]
pub struct RobotsGate {
    policy: Option<RobotsTxt>,
    user_agent: String,
}

impl RobotsGate {
    /// Gate backed by a fetched policy document
    pub fn new(policy: RobotsTxt, user_agent: &str) -> Self {
        Self {
            policy: Some(policy),
            user_agent: user_agent.to_string(),
        }
    }

    /// Gate that allows everything (disabled by config, or no policy reachable)
    pub fn allow_all() -> Self {
        Self {
            policy: None,
            user_agent: String::new(),
        }
    }

    pub fn can_fetch(&self, url: &Url) -> bool {
        match &self.policy {
            Some(policy) => policy.is_allowed(&self.user_agent, url.path()),
            None => true,
        }
    }
}
