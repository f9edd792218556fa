//! one-line human rendering of condition trees
//!
//! `(TEXT[f1] CONTAINS "abc" AND DATE[SYSTEM:CREATED_AT] BEFORE TODAY)`

use std::fmt;

use super::types::{
    CardCycleOperator, Condition, ConditionGroup, ConditionItem, ConditionNode, DateOperator,
    DateSubject, DateValue, EnumOperator, LinkOperator, NumberOperator, NumberValue, Operator,
    StatusOperator, TextOperator, UserOperator, WebUrlOperator,
};

fn write_list(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    write!(f, "[{}]", items.join(", "))
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => write!(f, "<no filter>"),
        }
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionNode::Group(group) => write!(f, "{}", group),
            ConditionNode::Item(item) => write!(f, "{}", item),
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.operator.as_str())?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ConditionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path() {
            write!(f, "via({}) ", path.link_nodes.join(" > "))?;
        }

        write!(f, "{}", self.node_type())?;
        match self {
            ConditionItem::Text(item) => write!(f, "[{}]", item.subject.field_id)?,
            ConditionItem::Number(item) => write!(f, "[{}]", item.subject.field_id)?,
            ConditionItem::Enum(item) => write!(f, "[{}]", item.subject.field_id)?,
            ConditionItem::WebUrl(item) => write!(f, "[{}]", item.subject.field_id)?,
            ConditionItem::Date(item) => match &item.subject {
                DateSubject::System { system_field, .. } => write!(
                    f,
                    "[SYSTEM:{}]",
                    system_field.map_or("?", |field| field.as_str())
                )?,
                DateSubject::Field { field_id, .. } => write!(f, "[{}]", field_id)?,
            },
            ConditionItem::Status(item) => write!(f, "[{}]", item.subject.stream_id)?,
            ConditionItem::Link(item) => write!(f, "[{}]", item.subject.link_field_id)?,
            ConditionItem::Title(_)
            | ConditionItem::Code(_)
            | ConditionItem::CardCycle(_)
            | ConditionItem::CreatedBy(_)
            | ConditionItem::UpdatedBy(_) => {}
        }

        match self {
            ConditionItem::Text(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::Title(item) | ConditionItem::Code(item) => {
                write_operator(f, item.operator.as_ref())
            }
            ConditionItem::Number(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::Date(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::Enum(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::Status(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::WebUrl(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::Link(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::CardCycle(item) => write_operator(f, item.operator.as_ref()),
            ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => {
                write_operator(f, item.operator.as_ref())
            }
        }
    }
}

/// renders the operator's comparison value, without the operator name
trait OperandDisplay {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

fn write_operator<O>(f: &mut fmt::Formatter<'_>, op: Option<&O>) -> fmt::Result
where
    O: Operator + OperandDisplay,
{
    match op {
        Some(op) => {
            write!(f, " {}", op.operator_type())?;
            op.fmt_operand(f)
        }
        None => write!(f, " <no operator>"),
    }
}

fn fmt_number(value: Option<&NumberValue>) -> String {
    match value {
        Some(NumberValue::Static { value: Some(n) }) => n.to_string(),
        Some(NumberValue::Reference { value }) => format!("${}", value),
        Some(NumberValue::Static { value: None }) | None => "?".to_string(),
    }
}

fn fmt_date(value: Option<&DateValue>) -> String {
    match value {
        Some(DateValue::KeyDate { key_date }) => key_date.to_string(),
        Some(DateValue::Specific { value }) => value.clone(),
        None => "?".to_string(),
    }
}

impl OperandDisplay for TextOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, " {:?}", value),
            None => Ok(()),
        }
    }
}

impl OperandDisplay for NumberOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOperator::Eq { value }
            | NumberOperator::Ne { value }
            | NumberOperator::Gt { value }
            | NumberOperator::Ge { value }
            | NumberOperator::Lt { value }
            | NumberOperator::Le { value } => write!(f, " {}", fmt_number(value.as_ref())),
            NumberOperator::Between { start, end } => write!(
                f,
                " {}..{}",
                fmt_number(start.as_ref()),
                fmt_number(end.as_ref())
            ),
            NumberOperator::IsEmpty | NumberOperator::IsNotEmpty => Ok(()),
        }
    }
}

impl OperandDisplay for DateOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOperator::Before { value }
            | DateOperator::After { value }
            | DateOperator::Eq { value } => write!(f, " {}", fmt_date(value.as_ref())),
            DateOperator::Between { start, end } => write!(
                f,
                " {}..{}",
                fmt_date(start.as_ref()),
                fmt_date(end.as_ref())
            ),
            DateOperator::IsEmpty | DateOperator::IsNotEmpty => Ok(()),
        }
    }
}

impl OperandDisplay for EnumOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumOperator::Eq { option_id } | EnumOperator::Ne { option_id } => {
                write!(f, " {}", option_id)
            }
            EnumOperator::In { option_ids } | EnumOperator::NotIn { option_ids } => {
                write!(f, " ")?;
                write_list(f, option_ids)
            }
            EnumOperator::IsEmpty | EnumOperator::IsNotEmpty => Ok(()),
        }
    }
}

impl OperandDisplay for StatusOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusOperator::Eq { status_id }
            | StatusOperator::Reached { status_id }
            | StatusOperator::NotReached { status_id }
            | StatusOperator::Passed { status_id } => write!(f, " {}", status_id),
            StatusOperator::In { status_ids } | StatusOperator::NotIn { status_ids } => {
                write!(f, " ")?;
                write_list(f, status_ids)
            }
        }
    }
}

impl OperandDisplay for WebUrlOperator {
    fn fmt_operand(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl OperandDisplay for LinkOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOperator::HasAny | LinkOperator::IsEmpty => Ok(()),
            LinkOperator::In { value } | LinkOperator::NotIn { value } => {
                write!(f, " ")?;
                match value {
                    Some(value) => write_list(f, value.card_ids()),
                    None => write!(f, "?"),
                }
            }
        }
    }
}

impl OperandDisplay for CardCycleOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardCycleOperator::In { values } => {
                let names: Vec<String> = values.iter().map(|v| v.as_str().to_string()).collect();
                write!(f, " ")?;
                write_list(f, &names)
            }
        }
    }
}

impl OperandDisplay for UserOperator {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserOperator::IsCurrentUser | UserOperator::IsNotCurrentUser => Ok(()),
            UserOperator::Eq { user_id } | UserOperator::Ne { user_id } => {
                write!(f, " {}", user_id)
            }
            UserOperator::In { user_ids } | UserOperator::NotIn { user_ids } => {
                write!(f, " ")?;
                write_list(f, user_ids)
            }
        }
    }
}
