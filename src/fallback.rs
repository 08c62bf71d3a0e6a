//! Offline fallback responder.
//!
//! Deterministic substitute for the remote query service, used only when the
//! backend call fails. Always produces an answer: the graceful-degradation
//! contract of the controller rests on this module being infallible.

use std::thread;
use std::time::Duration;

use crate::models::AnswerResponse;

/// Default simulated round-trip latency, so the fallback is visually
/// indistinguishable from a real backend call.
const SIMULATED_LATENCY: Duration = Duration::from_secs(2);

const PRINCIPLES_ANSWER: &str = r#"Based on our Enterprise Architecture knowledge base, here are the key principles:

1. **Business Alignment**: All technology decisions must directly support business objectives and capabilities.

2. **Standardization First**: Prefer standard, widely-adopted technologies over custom solutions.

3. **Security by Design**: Security and compliance requirements must be integrated into all architecture decisions.

4. **Data as an Asset**: Treat data as a strategic enterprise asset with proper governance.

5. **Agility and Flexibility**: Architectures should support rapid change while maintaining stability.

These principles guide our technology decisions and ensure alignment with business strategy."#;

const TECHNICAL_DEBT_ANSWER: &str = r#"Here's how to manage technical debt effectively, based on our comprehensive framework:

**Assessment & Prioritization:**
- Use our risk scoring matrix (Business Impact × Technical Risk × Effort Required)
- Prioritize P1 (Critical) items that pose security or compliance risks
- Focus on high-impact, low-effort improvements first

**Prevention Strategies:**
- Implement mandatory code reviews and static analysis
- Establish architecture review processes for major decisions
- Use automated testing and CI/CD pipelines

**Remediation Approaches:**
- **Refactoring**: Improve code structure and quality
- **Modernization**: Update to current technology standards
- **Consolidation**: Reduce duplicate systems and code
- **Automation**: Replace manual processes with automated solutions

**Ongoing Management:**
- Regular quarterly reviews and updates
- Track debt reduction metrics and celebrate successes
- Maintain momentum with visible progress indicators"#;

const DEFAULT_ANSWER_TEMPLATE: &str = r#"I've analyzed your question about "{query}" using our Enterprise Architecture knowledge base.

Based on the retrieved information, here are the key insights:

**Key Findings:**
- Multiple relevant documents were found in our corpus
- The information spans across business capabilities, technical standards, and governance frameworks
- Our RAG system successfully identified the most relevant sections for your query

**Recommendations:**
- Consider the business impact and alignment of any decisions
- Evaluate technical fit and standards compliance
- Assess security and compliance requirements
- Analyze total cost of ownership

**Next Steps:**
- Review the specific guidance from our knowledge base
- Consult with relevant stakeholders
- Document any architectural decisions using our ADR framework

Would you like me to dive deeper into any specific aspect of this topic?"#;

/// Response classes the fallback distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseKind {
    Principles,
    TechnicalDebt,
    General,
}

/// Classifies a query by substring, case-insensitively.
fn classify(query: &str) -> ResponseKind {
    let lowered = query.to_lowercase();
    if lowered.contains("technical debt") || lowered.contains("tech debt") {
        ResponseKind::TechnicalDebt
    } else if lowered.contains("principle") {
        ResponseKind::Principles
    } else {
        ResponseKind::General
    }
}

/// Local deterministic substitute for the remote answer service.
///
/// `respond` is a pure function of the query text plus a fixed delay; it
/// reads and writes no external state and cannot fail.
#[derive(Debug, Clone)]
pub struct FallbackResponder {
    delay: Duration,
}

impl FallbackResponder {
    /// Creates a responder with the default 2-second simulated latency.
    pub fn new() -> Self {
        Self {
            delay: SIMULATED_LATENCY,
        }
    }

    /// Creates a responder with a custom latency. Tests use `Duration::ZERO`.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Produces a canned answer for the query after the simulated latency.
    ///
    /// Classification, on the lowercased query text:
    /// - "technical debt" / "tech debt" anywhere: the technical-debt answer
    /// - "principle" anywhere: the principles answer
    /// - otherwise: the general template with the query interpolated verbatim
    pub fn respond(&self, query: &str) -> AnswerResponse {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match classify(query) {
            ResponseKind::Principles => AnswerResponse::new(
                PRINCIPLES_ANSWER,
                vec!["ea_principles.md".into(), "tech_standards_guide.md".into()],
                0.95,
            ),
            ResponseKind::TechnicalDebt => AnswerResponse::new(
                TECHNICAL_DEBT_ANSWER,
                vec![
                    "technical_debt_management.md".into(),
                    "architecture_decision_records.md".into(),
                ],
                0.92,
            ),
            ResponseKind::General => AnswerResponse::new(
                DEFAULT_ANSWER_TEMPLATE.replace("{query}", query),
                vec![
                    "ea_principles.md".into(),
                    "tech_standards_guide.md".into(),
                    "business_capability_mapping.md".into(),
                ],
                0.88,
            ),
        }
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}
