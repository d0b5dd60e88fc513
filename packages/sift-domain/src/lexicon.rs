//! Keyword lexicons behind topic, sentiment, and action tagging. The business
//! lexicon is always active; the others activate per requested domain.

use crate::tagging::Domain;

pub struct TopicLexicon {
	pub topic: &'static str,
	pub keywords: &'static [&'static str],
}

pub struct ActionLexicon {
	pub action: &'static str,
	pub verbs: &'static [&'static str],
}

pub const BUSINESS: &[TopicLexicon] = &[
	TopicLexicon {
		topic: "meeting",
		keywords: &["meeting", "meetings", "agenda", "minutes", "standup", "sync"],
	},
	TopicLexicon {
		topic: "budget",
		keywords: &["budget", "budgets", "cost", "costs", "expense", "expenses", "spend"],
	},
	TopicLexicon {
		topic: "planning",
		keywords: &["plan", "plans", "planning", "roadmap", "milestone", "milestones", "timeline"],
	},
	TopicLexicon {
		topic: "sales",
		keywords: &["sales", "deal", "deals", "pipeline", "prospect", "prospects", "quota"],
	},
	TopicLexicon {
		topic: "marketing",
		keywords: &["marketing", "campaign", "campaigns", "brand", "launch", "outreach"],
	},
	TopicLexicon {
		topic: "hiring",
		keywords: &["hiring", "recruiting", "interview", "interviews", "candidate", "candidates"],
	},
	TopicLexicon {
		topic: "strategy",
		keywords: &["strategy", "strategic", "vision", "goals", "objectives", "okr", "okrs"],
	},
	TopicLexicon {
		topic: "customer",
		keywords: &["customer", "customers", "client", "clients", "feedback", "support"],
	},
];

pub const TECHNICAL: &[TopicLexicon] = &[
	TopicLexicon {
		topic: "engineering",
		keywords: &["code", "deploy", "deployment", "release", "bug", "bugs", "refactor", "api"],
	},
	TopicLexicon {
		topic: "infrastructure",
		keywords: &["server", "servers", "cloud", "kubernetes", "docker", "database", "latency"],
	},
	TopicLexicon {
		topic: "security",
		keywords: &["security", "vulnerability", "encryption", "authentication", "audit"],
	},
	TopicLexicon {
		topic: "data",
		keywords: &["data", "analytics", "metrics", "dashboard", "pipeline", "warehouse"],
	},
];

pub const FINANCIAL: &[TopicLexicon] = &[
	TopicLexicon {
		topic: "revenue",
		keywords: &["revenue", "income", "earnings", "profit", "margin", "margins"],
	},
	TopicLexicon {
		topic: "forecast",
		keywords: &["forecast", "forecasts", "projection", "projections", "outlook"],
	},
	TopicLexicon {
		topic: "accounting",
		keywords: &["invoice", "invoices", "payable", "receivable", "ledger", "reconciliation"],
	},
	TopicLexicon {
		topic: "investment",
		keywords: &["investment", "investors", "funding", "valuation", "equity"],
	},
];

pub const LEGAL: &[TopicLexicon] = &[
	TopicLexicon {
		topic: "contracts",
		keywords: &["contract", "contracts", "agreement", "agreements", "clause", "terms"],
	},
	TopicLexicon {
		topic: "compliance",
		keywords: &["compliance", "regulation", "regulations", "regulatory", "policy"],
	},
	TopicLexicon {
		topic: "privacy",
		keywords: &["privacy", "gdpr", "consent", "confidential", "confidentiality"],
	},
	TopicLexicon {
		topic: "litigation",
		keywords: &["litigation", "lawsuit", "dispute", "liability", "settlement"],
	},
];

pub const POSITIVE: &[&str] = &[
	"good", "great", "excellent", "success", "successful", "improved", "improvement", "win",
	"wins", "positive", "growth", "strong", "effective", "achieved", "ahead",
];

pub const NEGATIVE: &[&str] = &[
	"bad", "poor", "failure", "failed", "problem", "problems", "issue", "issues", "risk", "risks",
	"delay", "delayed", "concern", "concerns", "negative", "decline", "behind", "blocker",
];

pub const ACTIONS: &[ActionLexicon] = &[
	ActionLexicon { action: "review", verbs: &["review", "reviewed", "reviewing"] },
	ActionLexicon { action: "approve", verbs: &["approve", "approved", "approval", "signoff"] },
	ActionLexicon { action: "schedule", verbs: &["schedule", "scheduled", "reschedule", "book"] },
	ActionLexicon { action: "follow-up", verbs: &["follow", "followup", "remind", "reminder"] },
	ActionLexicon { action: "decide", verbs: &["decide", "decision", "decisions", "finalize"] },
	ActionLexicon { action: "submit", verbs: &["submit", "submitted", "send", "deliver"] },
];

pub fn domain_lexicon(domain: Domain) -> &'static [TopicLexicon] {
	match domain {
		Domain::General => &[],
		Domain::Technical => TECHNICAL,
		Domain::Financial => FINANCIAL,
		Domain::Legal => LEGAL,
	}
}
