use crate::{Entity, EntityType, Parameters, QueryError, Result, SqlGenerator, Value, try_separated_by};
use std::{borrow::Cow, ops::Not};

/// Binary comparison operator of field and property predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

/// Rendering of every operator, plain and negated, indexed by discriminant.
const OPERATORS: [(&str, &str); 6] = [
    ("=", "<>"),
    (">", "<="),
    (">=", "<"),
    ("<", ">="),
    ("<=", ">"),
    ("LIKE", "NOT LIKE"),
];

impl Operator {
    /// SQL of the operator, negation inverts the comparison instead of wrapping it in `NOT`.
    pub fn sql(&self, not: bool) -> &'static str {
        let (plain, negated) = OPERATORS[*self as usize];
        if not { negated } else { plain }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub fn sql(&self) -> &'static str {
        match self {
            GroupOperator::And => " AND ",
            GroupOperator::Or => " OR ",
        }
    }
    fn inverted(self) -> Self {
        match self {
            GroupOperator::And => GroupOperator::Or,
            GroupOperator::Or => GroupOperator::And,
        }
    }
}

/// Compares a column with a value, a list of values or NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub entity: EntityType,
    pub property: Cow<'static, str>,
    pub operator: Operator,
    pub value: Value,
    pub not: bool,
}

/// Compares two columns, possibly of different entities.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPredicate {
    pub entity: EntityType,
    pub property: Cow<'static, str>,
    pub operator: Operator,
    pub entity2: EntityType,
    pub property2: Cow<'static, str>,
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BetweenPredicate {
    pub entity: EntityType,
    pub property: Cow<'static, str>,
    pub low: Value,
    pub high: Value,
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredicateGroup {
    pub operator: GroupOperator,
    pub predicates: Vec<Predicate>,
}

/// Correlated sub query over the table of another entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsPredicate {
    pub entity: EntityType,
    pub predicate: Box<Predicate>,
    pub not: bool,
}

/// Node of a predicate tree, compiled into a WHERE fragment plus bound parameters.
///
/// ```rust
/// # use quill_core::*;
/// # #[derive(Default)]
/// # struct Person;
/// # impl Entity for Person {
/// #     fn class_map() -> ClassMap { ClassMap::new("Person").map(PropertyMap::new("Age")) }
/// #     fn get_value(&self, _: &str) -> Option<Value> { None }
/// #     fn set_value(&mut self, _: &str, _: Value) -> Result<()> { Ok(()) }
/// # }
/// let adults = !field::<Person>("Age", Operator::Lt, 18);
/// let generator = SqlGenerator::new(Configuration::new(GenericDialect).into());
/// let mut parameters = Parameters::new();
/// let sql = adults.to_sql(&generator, &mut parameters).unwrap();
/// assert_eq!(sql, r#"("Person"."Age" >= @Age_0)"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Field(FieldPredicate),
    Property(PropertyPredicate),
    Between(BetweenPredicate),
    Group(PredicateGroup),
    Exists(ExistsPredicate),
}

pub fn field<E: Entity>(
    property: impl Into<Cow<'static, str>>,
    operator: Operator,
    value: impl Into<Value>,
) -> Predicate {
    Predicate::Field(FieldPredicate {
        entity: EntityType::of::<E>(),
        property: property.into(),
        operator,
        value: value.into(),
        not: false,
    })
}

pub fn property<E: Entity, E2: Entity>(
    property: impl Into<Cow<'static, str>>,
    operator: Operator,
    property2: impl Into<Cow<'static, str>>,
) -> Predicate {
    Predicate::Property(PropertyPredicate {
        entity: EntityType::of::<E>(),
        property: property.into(),
        operator,
        entity2: EntityType::of::<E2>(),
        property2: property2.into(),
        not: false,
    })
}

pub fn between<E: Entity>(
    property: impl Into<Cow<'static, str>>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Predicate {
    Predicate::Between(BetweenPredicate {
        entity: EntityType::of::<E>(),
        property: property.into(),
        low: low.into(),
        high: high.into(),
        not: false,
    })
}

pub fn group(operator: GroupOperator, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Group(PredicateGroup {
        operator,
        predicates: predicates.into_iter().collect(),
    })
}

pub fn exists<E: Entity>(predicate: Predicate) -> Predicate {
    Predicate::Exists(ExistsPredicate {
        entity: EntityType::of::<E>(),
        predicate: predicate.into(),
        not: false,
    })
}

pub fn sort<E: Entity>(property: impl Into<Cow<'static, str>>, ascending: bool) -> Sort {
    Sort {
        entity: EntityType::of::<E>(),
        property: property.into(),
        ascending,
    }
}

/// Ordering term of a select, kept apart from the boolean tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub entity: EntityType,
    pub property: Cow<'static, str>,
    pub ascending: bool,
}

impl Predicate {
    /// True when the tree has no condition at all: a group whose leaves are all empty groups.
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::Group(group) => group.predicates.iter().all(Predicate::is_empty),
            _ => false,
        }
    }

    /// Logical negation, groups are negated by De Morgan's laws.
    pub fn negate(self) -> Self {
        match self {
            Predicate::Field(mut v) => {
                v.not = !v.not;
                Predicate::Field(v)
            }
            Predicate::Property(mut v) => {
                v.not = !v.not;
                Predicate::Property(v)
            }
            Predicate::Between(mut v) => {
                v.not = !v.not;
                Predicate::Between(v)
            }
            Predicate::Exists(mut v) => {
                v.not = !v.not;
                Predicate::Exists(v)
            }
            Predicate::Group(PredicateGroup {
                operator,
                predicates,
            }) => Predicate::Group(PredicateGroup {
                operator: operator.inverted(),
                predicates: predicates.into_iter().map(Predicate::negate).collect(),
            }),
        }
    }

    /// Append the SQL of this predicate to `out`, binding its values into `parameters`.
    pub fn write_sql(
        &self,
        generator: &SqlGenerator,
        out: &mut String,
        parameters: &mut Parameters,
    ) -> Result<()> {
        match self {
            Predicate::Field(v) => v.write_sql(generator, out, parameters),
            Predicate::Property(v) => {
                out.push('(');
                generator.write_column_for(out, v.entity, &v.property)?;
                out.push(' ');
                out.push_str(v.operator.sql(v.not));
                out.push(' ');
                generator.write_column_for(out, v.entity2, &v.property2)?;
                out.push(')');
                Ok(())
            }
            Predicate::Between(v) => {
                out.push('(');
                generator.write_column_for(out, v.entity, &v.property)?;
                out.push_str(if v.not { " NOT BETWEEN " } else { " BETWEEN " });
                generator.write_parameter(out, parameters, &v.property, v.low.clone());
                out.push_str(" AND ");
                generator.write_parameter(out, parameters, &v.property, v.high.clone());
                out.push(')');
                Ok(())
            }
            Predicate::Group(v) => {
                // Empty children are neutral under either operator, negated or not
                let predicates: Vec<_> = v.predicates.iter().filter(|p| !p.is_empty()).collect();
                if predicates.is_empty() {
                    out.push_str(generator.dialect().empty_expression());
                    return Ok(());
                }
                out.push('(');
                try_separated_by(
                    out,
                    predicates,
                    |out, p| p.write_sql(generator, out, parameters),
                    v.operator.sql(),
                )?;
                out.push(')');
                Ok(())
            }
            Predicate::Exists(v) => {
                let map = generator.map(v.entity)?;
                out.push_str(if v.not { "(NOT EXISTS (SELECT 1 FROM " } else { "(EXISTS (SELECT 1 FROM " });
                generator.dialect().write_table_name(out, &map);
                out.push_str(" WHERE ");
                v.predicate.write_sql(generator, out, parameters)?;
                out.push_str("))");
                Ok(())
            }
        }
    }

    pub fn to_sql(&self, generator: &SqlGenerator, parameters: &mut Parameters) -> Result<String> {
        let mut out = String::with_capacity(64);
        self.write_sql(generator, &mut out, parameters)?;
        Ok(out)
    }
}

impl FieldPredicate {
    fn write_sql(
        &self,
        generator: &SqlGenerator,
        out: &mut String,
        parameters: &mut Parameters,
    ) -> Result<()> {
        match &self.value {
            Value::Null => {
                out.push('(');
                generator.write_column_for(out, self.entity, &self.property)?;
                out.push_str(if self.not { " IS NOT NULL)" } else { " IS NULL)" });
            }
            Value::List(values) => {
                if self.operator != Operator::Eq {
                    return Err(QueryError::EnumerableOperator.into());
                }
                // Still resolved so an unknown property fails even with an empty list
                let mut column = String::new();
                generator.write_column_for(&mut column, self.entity, &self.property)?;
                if values.is_empty() {
                    out.push_str(if self.not { "(1=1)" } else { "(1=0)" });
                    return Ok(());
                }
                out.push('(');
                out.push_str(&column);
                out.push_str(if self.not { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    generator.write_parameter(out, parameters, &self.property, value.clone());
                }
                out.push_str("))");
            }
            value => {
                out.push('(');
                generator.write_column_for(out, self.entity, &self.property)?;
                out.push(' ');
                out.push_str(self.operator.sql(self.not));
                out.push(' ');
                generator.write_parameter(out, parameters, &self.property, value.clone());
                out.push(')');
            }
        }
        Ok(())
    }
}

impl Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl From<FieldPredicate> for Predicate {
    fn from(value: FieldPredicate) -> Self {
        Predicate::Field(value)
    }
}

impl From<PredicateGroup> for Predicate {
    fn from(value: PredicateGroup) -> Self {
        Predicate::Group(value)
    }
}
