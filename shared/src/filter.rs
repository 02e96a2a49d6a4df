//! Filter compiler
//!
//! Turns a loosely typed filter request (string keys and string values, as
//! sent by the inventory grid) into a typed [`FilterRequest`], and compiles
//! that into a conjunctive [`Predicate`] over stock units plus a separate
//! [`PriceRange`] applied after reconciliation.
//!
//! Free-text lookups that need storage (warehouse roots, group search,
//! category tree, customs declaration candidates) are resolved by the caller
//! and handed in as [`FilterLookups`].

use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CategoryTree, PriceField, ProductAggregate, ProductPrices, StockUnit};
use crate::reconcile::{reconcile, sorted_by_name};
use crate::types::{CategoryId, GroupId, LocationId, ProductId, UnitId};
use crate::validation::{
    contains_ignore_case, field_contains, normalize_customs_declaration, split_serial_numbers,
};

/// Stored thickness values carry float noise; matches are within this band
pub fn thickness_tolerance() -> Decimal {
    Decimal::new(1, 3)
}

// ============================================================================
// Typed request
// ============================================================================

/// An optional filter value that has to be parsed.
///
/// A value that fails to parse is kept as `Ignored` so it can be logged, but
/// it never constrains the result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue<T> {
    #[default]
    Absent,
    Value(T),
    Ignored(String),
}

pub type NumericFilter = FilterValue<Decimal>;
pub type IdFilter = FilterValue<Uuid>;

impl<T: std::str::FromStr> FilterValue<T> {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => FilterValue::Absent,
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => FilterValue::Value(v),
                Err(_) => FilterValue::Ignored(raw.to_string()),
            },
        }
    }
}

impl<T: Copy> FilterValue<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            FilterValue::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FilterValue::Absent)
    }
}

/// Every filter key the grid understands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterRequest {
    pub product_name: Option<String>,
    pub warehouse_id: IdFilter,
    pub location_id: IdFilter,
    pub stone_type: Option<String>,
    pub category_name: Option<String>,
    pub group: Option<String>,
    pub finish: Option<String>,
    pub color: Option<String>,
    pub thickness: NumericFilter,
    pub serial_numbers: Option<String>,
    pub block: Option<String>,
    pub container: Option<String>,
    pub bundle: Option<String>,
    pub customs_declaration: Option<String>,
    pub min_height: NumericFilter,
    pub min_width: NumericFilter,
    pub price_min: NumericFilter,
    pub price_max: NumericFilter,
    pub price_currency: Option<String>,
    pub price_level: Option<String>,
}

impl FilterRequest {
    /// Build from raw key/value pairs. Unknown keys are ignored and blank
    /// values count as absent.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw: HashMap<String, String> = pairs
            .into_iter()
            .filter_map(|(k, v)| {
                let v = v.as_ref().trim();
                (!v.is_empty()).then(|| (k.as_ref().to_string(), v.to_string()))
            })
            .collect();
        let text = |key: &str| raw.get(key).cloned();
        let get = |key: &str| raw.get(key).map(String::as_str);

        FilterRequest {
            product_name: text("product_name"),
            warehouse_id: FilterValue::parse(get("warehouse_id")),
            location_id: FilterValue::parse(get("location_id")),
            stone_type: text("type"),
            category_name: text("category_name"),
            group: text("group"),
            finish: text("finish"),
            color: text("color"),
            thickness: FilterValue::parse(get("thickness")),
            serial_numbers: text("serial_numbers"),
            block: text("block"),
            container: text("container"),
            bundle: text("bundle"),
            customs_declaration: text("customs_declaration"),
            min_height: FilterValue::parse(get("min_height")),
            min_width: FilterValue::parse(get("min_width")),
            price_min: FilterValue::parse(get("price_min")),
            price_max: FilterValue::parse(get("price_max")),
            price_currency: text("price_currency"),
            price_level: text("price_level"),
        }
    }

    /// Build from a JSON object; strings and numbers are accepted as values
    pub fn from_json(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_pairs(object.iter().filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k.as_str(), s.clone())),
            serde_json::Value::Number(n) => Some((k.as_str(), n.to_string())),
            _ => None,
        }))
    }

    /// True when no key carries a value. Currency and level alone only
    /// qualify a price bound and do not count.
    pub fn is_empty(&self) -> bool {
        let texts = [
            &self.product_name,
            &self.stone_type,
            &self.category_name,
            &self.group,
            &self.finish,
            &self.color,
            &self.serial_numbers,
            &self.block,
            &self.container,
            &self.bundle,
            &self.customs_declaration,
        ];
        let numbers = [
            &self.thickness,
            &self.min_height,
            &self.min_width,
            &self.price_min,
            &self.price_max,
        ];
        texts.iter().all(|t| t.is_none())
            && numbers.iter().all(|n| n.is_absent())
            && self.warehouse_id.is_absent()
            && self.location_id.is_absent()
    }

    /// Requested lot names, in request order
    pub fn lot_names(&self) -> Vec<String> {
        self.serial_numbers
            .as_deref()
            .map(split_serial_numbers)
            .unwrap_or_default()
    }

    fn log_ignored(&self) {
        let numeric = [
            ("thickness", &self.thickness),
            ("min_height", &self.min_height),
            ("min_width", &self.min_width),
            ("price_min", &self.price_min),
            ("price_max", &self.price_max),
        ];
        for (key, filter) in numeric {
            if let FilterValue::Ignored(raw) = filter {
                tracing::debug!(key, value = %raw, "ignoring malformed numeric filter");
            }
        }
        for (key, filter) in [("warehouse_id", &self.warehouse_id), ("location_id", &self.location_id)] {
            if let FilterValue::Ignored(raw) = filter {
                tracing::debug!(key, value = %raw, "ignoring malformed id filter");
            }
        }
    }
}

// ============================================================================
// Lookups resolved by the caller
// ============================================================================

/// Storage-backed lookups the compiler needs. Each `Option` is `None` when
/// the corresponding filter is absent from the request.
#[derive(Debug, Clone, Default)]
pub struct FilterLookups {
    /// Root location of the requested warehouse, if the warehouse exists
    pub warehouse_root: Option<LocationId>,
    pub categories: CategoryTree,
    /// Related records whose name matched the `group` term
    pub group_matches: Option<Vec<GroupId>>,
    /// Every unit with a non-empty customs declaration, with that value
    pub customs_candidates: Option<Vec<(UnitId, String)>>,
}

// ============================================================================
// Predicate
// ============================================================================

/// One conjunct of the compiled predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    PositiveQuantity,
    ProductNameContains(String),
    WithinLocation(LocationId),
    TypeEquals(String),
    CategoryIn(Vec<CategoryId>),
    GroupIn(Vec<GroupId>),
    FinishEquals(String),
    ColorContains(String),
    ThicknessBetween { low: Decimal, high: Decimal },
    LotNameIn(Vec<String>),
    BlockContains(String),
    ContainerContains(String),
    BundleContains(String),
    UnitIn(Vec<UnitId>),
    MinHeight(Decimal),
    MinWidth(Decimal),
    /// A lookup resolved to nothing; matches no unit
    Impossible,
}

impl Clause {
    pub fn matches(&self, unit: &StockUnit) -> bool {
        match self {
            Clause::PositiveQuantity => unit.quantity > Decimal::ZERO,
            Clause::ProductNameContains(term) => contains_ignore_case(&unit.product_name, term),
            Clause::WithinLocation(root) => unit.is_within_location(*root),
            Clause::TypeEquals(t) => unit.stone_type.as_deref() == Some(t.as_str()),
            Clause::CategoryIn(ids) => unit.category_id.map_or(false, |c| ids.contains(&c)),
            Clause::GroupIn(ids) => unit.group_id.map_or(false, |g| ids.contains(&g)),
            Clause::FinishEquals(f) => unit.finish.as_deref() == Some(f.as_str()),
            Clause::ColorContains(term) => field_contains(unit.color.as_deref(), term),
            Clause::ThicknessBetween { low, high } => unit
                .thickness
                .map_or(false, |t| t >= *low && t <= *high),
            Clause::LotNameIn(names) => unit
                .lot_name
                .as_ref()
                .map_or(false, |n| names.contains(n)),
            Clause::BlockContains(term) => field_contains(unit.block.as_deref(), term),
            Clause::ContainerContains(term) => field_contains(unit.container.as_deref(), term),
            Clause::BundleContains(term) => field_contains(unit.bundle.as_deref(), term),
            Clause::UnitIn(ids) => ids.contains(&unit.id),
            Clause::MinHeight(min) => unit.height.map_or(false, |h| h >= *min),
            Clause::MinWidth(min) => unit.width.map_or(false, |w| w >= *min),
            Clause::Impossible => false,
        }
    }
}

/// Conjunction of clauses; always starts with [`Clause::PositiveQuantity`]
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_impossible(&self) -> bool {
        self.clauses.contains(&Clause::Impossible)
    }

    pub fn matches(&self, unit: &StockUnit) -> bool {
        self.clauses.iter().all(|c| c.matches(unit))
    }
}

// ============================================================================
// Price range
// ============================================================================

/// Post-aggregation price bounds on one resolved price column
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub field: PriceField,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// Output of [`compile`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub predicate: Predicate,
    /// Lot names requested through `serial_numbers`
    pub lot_names: Vec<String>,
    pub price: PriceRange,
}

/// Compile a request into a unit predicate and a price range
pub fn compile(request: &FilterRequest, lookups: &FilterLookups) -> CompiledFilter {
    request.log_ignored();

    let mut clauses = vec![Clause::PositiveQuantity];

    if let Some(term) = &request.product_name {
        clauses.push(Clause::ProductNameContains(term.clone()));
    }

    if request.warehouse_id.value().is_some() {
        match lookups.warehouse_root {
            Some(root) => clauses.push(Clause::WithinLocation(root)),
            None => clauses.push(Clause::Impossible),
        }
    }
    if let Some(location) = request.location_id.value() {
        clauses.push(Clause::WithinLocation(location));
    }

    if let Some(t) = &request.stone_type {
        clauses.push(Clause::TypeEquals(t.clone()));
    }

    if let Some(term) = &request.category_name {
        let leaves = lookups.categories.leaf_ids_matching(term);
        if leaves.is_empty() {
            clauses.push(Clause::Impossible);
        } else {
            clauses.push(Clause::CategoryIn(leaves));
        }
    }

    if request.group.is_some() {
        match &lookups.group_matches {
            Some(ids) if !ids.is_empty() => clauses.push(Clause::GroupIn(ids.clone())),
            _ => clauses.push(Clause::Impossible),
        }
    }

    if let Some(f) = &request.finish {
        clauses.push(Clause::FinishEquals(f.clone()));
    }
    if let Some(term) = &request.color {
        clauses.push(Clause::ColorContains(term.clone()));
    }

    if let Some(t) = request.thickness.value() {
        let tolerance = thickness_tolerance();
        clauses.push(Clause::ThicknessBetween {
            low: t - tolerance,
            high: t + tolerance,
        });
    }

    let lot_names = request.lot_names();
    if !lot_names.is_empty() {
        clauses.push(Clause::LotNameIn(lot_names.clone()));
    }

    if let Some(term) = &request.block {
        clauses.push(Clause::BlockContains(term.clone()));
    }
    if let Some(term) = &request.container {
        clauses.push(Clause::ContainerContains(term.clone()));
    }
    if let Some(term) = &request.bundle {
        clauses.push(Clause::BundleContains(term.clone()));
    }

    if let Some(term) = &request.customs_declaration {
        let wanted = normalize_customs_declaration(term);
        let ids: Vec<UnitId> = lookups
            .customs_candidates
            .iter()
            .flatten()
            .filter(|(_, value)| normalize_customs_declaration(value) == wanted)
            .map(|(id, _)| *id)
            .collect();
        if ids.is_empty() {
            clauses.push(Clause::Impossible);
        } else {
            clauses.push(Clause::UnitIn(ids));
        }
    }

    if let Some(h) = request.min_height.value() {
        clauses.push(Clause::MinHeight(h));
    }
    if let Some(w) = request.min_width.value() {
        clauses.push(Clause::MinWidth(w));
    }

    let price = PriceRange {
        field: PriceField::resolve(
            request.price_currency.as_deref(),
            request.price_level.as_deref(),
        ),
        min: request.price_min.value(),
        max: request.price_max.value(),
    };

    CompiledFilter {
        predicate: Predicate { clauses },
        lot_names,
        price,
    }
}

/// Requested lot names not present among `units`, sorted and de-duplicated
pub fn missing_lots<'a, I>(requested: &[String], units: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a StockUnit>,
{
    let found: HashSet<&str> = units
        .into_iter()
        .filter_map(|u| u.lot_name.as_deref())
        .collect();
    requested
        .iter()
        .filter(|name| !found.contains(name.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Drop products whose resolved price falls outside the range. Products
/// without a price record are priced at zero.
pub fn apply_price_filter(
    products: HashMap<ProductId, ProductAggregate>,
    range: &PriceRange,
    prices: &HashMap<ProductId, ProductPrices>,
) -> HashMap<ProductId, ProductAggregate> {
    if !range.is_active() {
        return products;
    }
    products
        .into_iter()
        .filter(|(id, _)| {
            let price = prices
                .get(id)
                .map(|p| p.get(range.field))
                .unwrap_or(Decimal::ZERO);
            range.contains(price)
        })
        .collect()
}

// ============================================================================
// Grouped inventory
// ============================================================================

/// Response of the grouped inventory view
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedInventory {
    pub products: Vec<ProductAggregate>,
    pub missing_lots: Vec<String>,
}

/// Run the whole read pipeline over a unit snapshot: unit predicate, lot
/// diagnostics, reconciliation, then the price stage.
pub fn grouped_inventory(
    units: &[StockUnit],
    compiled: &CompiledFilter,
    categories: &CategoryTree,
    prices: &HashMap<ProductId, ProductPrices>,
) -> GroupedInventory {
    if compiled.predicate.is_impossible() {
        return GroupedInventory {
            products: Vec::new(),
            missing_lots: missing_lots(&compiled.lot_names, std::iter::empty()),
        };
    }

    let selected: Vec<&StockUnit> = units
        .iter()
        .filter(|u| compiled.predicate.matches(u))
        .collect();

    let missing = missing_lots(&compiled.lot_names, selected.iter().copied());
    let products = reconcile(selected, categories);
    let products = apply_price_filter(products, &compiled.price, prices);

    GroupedInventory {
        products: sorted_by_name(products),
        missing_lots: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn unit(name: &str) -> StockUnit {
        StockUnit {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            quantity: dec("4"),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_pairs_ignores_unknown_and_blank() {
        let request = FilterRequest::from_pairs([
            ("color", "blanco"),
            ("finish", "   "),
            ("unknown", "x"),
        ]);
        assert_eq!(request.color.as_deref(), Some("blanco"));
        assert!(request.finish.is_none());
        assert!(!request.is_empty());
        assert!(FilterRequest::from_pairs([("unknown", "x")]).is_empty());
    }

    #[test]
    fn test_currency_alone_is_empty() {
        let request = FilterRequest::from_pairs([("price_currency", "MXN")]);
        assert!(request.is_empty());
    }

    #[test]
    fn test_malformed_numeric_is_ignored() {
        let request = FilterRequest::from_pairs([("thickness", "abc"), ("min_height", "1.5")]);
        assert_eq!(request.thickness, FilterValue::Ignored("abc".to_string()));

        let compiled = compile(&request, &FilterLookups::default());
        assert!(!compiled
            .predicate
            .clauses()
            .iter()
            .any(|c| matches!(c, Clause::ThicknessBetween { .. })));
        assert!(compiled.predicate.clauses().contains(&Clause::MinHeight(dec("1.5"))));
    }

    #[test]
    fn test_from_json_accepts_numbers() {
        let value = serde_json::json!({"thickness": 2, "color": "gris", "flag": true});
        let request = FilterRequest::from_json(value.as_object().unwrap());
        assert_eq!(request.thickness.value(), Some(dec("2")));
        assert_eq!(request.color.as_deref(), Some("gris"));
    }

    #[test]
    fn test_thickness_tolerance() {
        let request = FilterRequest::from_pairs([("thickness", "2")]);
        let compiled = compile(&request, &FilterLookups::default());

        let mut u = unit("Blanco");
        u.thickness = Some(dec("2.0009"));
        assert!(compiled.predicate.matches(&u));
        u.thickness = Some(dec("1.999"));
        assert!(compiled.predicate.matches(&u));
        u.thickness = Some(dec("2.002"));
        assert!(!compiled.predicate.matches(&u));
        u.thickness = None;
        assert!(!compiled.predicate.matches(&u));
    }

    #[test]
    fn test_zero_quantity_never_matches() {
        let compiled = compile(&FilterRequest::default(), &FilterLookups::default());
        let mut u = unit("Blanco");
        assert!(compiled.predicate.matches(&u));
        u.quantity = Decimal::ZERO;
        assert!(!compiled.predicate.matches(&u));
    }

    #[test]
    fn test_text_filters_case_insensitive_substring() {
        let request = FilterRequest::from_pairs([("product_name", "carr"), ("block", "b12")]);
        let compiled = compile(&request, &FilterLookups::default());

        let mut u = unit("Blanco CARRARA");
        u.block = Some("BLK-B12".to_string());
        assert!(compiled.predicate.matches(&u));
        u.block = None;
        assert!(!compiled.predicate.matches(&u));
    }

    #[test]
    fn test_finish_and_type_are_exact() {
        let request = FilterRequest::from_pairs([("finish", "polished"), ("type", "marble")]);
        let compiled = compile(&request, &FilterLookups::default());

        let mut u = unit("Blanco");
        u.finish = Some("polished".to_string());
        u.stone_type = Some("marble".to_string());
        assert!(compiled.predicate.matches(&u));
        u.finish = Some("Polished".to_string());
        assert!(!compiled.predicate.matches(&u));
    }

    #[test]
    fn test_leaf_category_resolution() {
        let a = Category { id: Uuid::new_v4(), name: "A".to_string(), parent_id: None };
        let b = Category { id: Uuid::new_v4(), name: "B".to_string(), parent_id: Some(a.id) };
        let c = Category { id: Uuid::new_v4(), name: "C".to_string(), parent_id: Some(b.id) };
        let lookups = FilterLookups {
            categories: CategoryTree::new(vec![a.clone(), b.clone(), c.clone()]),
            ..Default::default()
        };
        let compiled = compile(&FilterRequest::from_pairs([("category_name", "A")]), &lookups);

        let mut u = unit("Blanco");
        for (category, expected) in [(a.id, false), (b.id, false), (c.id, true)] {
            u.category_id = Some(category);
            assert_eq!(compiled.predicate.matches(&u), expected);
        }
    }

    #[test]
    fn test_unknown_category_is_impossible() {
        let compiled = compile(
            &FilterRequest::from_pairs([("category_name", "granite")]),
            &FilterLookups::default(),
        );
        assert!(compiled.predicate.is_impossible());
    }

    #[test]
    fn test_group_without_matches_is_impossible() {
        let request = FilterRequest::from_pairs([("group", "nonexistent-term")]);
        let lookups = FilterLookups {
            group_matches: Some(Vec::new()),
            ..Default::default()
        };
        let compiled = compile(&request, &lookups);
        assert!(compiled.predicate.is_impossible());

        let result = grouped_inventory(&[unit("Blanco")], &compiled, &lookups.categories, &HashMap::new());
        assert!(result.products.is_empty());
    }

    #[test]
    fn test_group_matches_restrict_units() {
        let group = Uuid::new_v4();
        let lookups = FilterLookups {
            group_matches: Some(vec![group]),
            ..Default::default()
        };
        let compiled = compile(&FilterRequest::from_pairs([("group", "italia")]), &lookups);
        let mut u = unit("Blanco");
        assert!(!compiled.predicate.matches(&u));
        u.group_id = Some(group);
        assert!(compiled.predicate.matches(&u));
    }

    #[test]
    fn test_unknown_warehouse_is_impossible() {
        let request = FilterRequest::from_pairs([("warehouse_id", Uuid::new_v4().to_string())]);
        assert!(compile(&request, &FilterLookups::default()).predicate.is_impossible());
    }

    #[test]
    fn test_customs_declaration_normalized_in_memory() {
        let hit = Uuid::new_v4();
        let lookups = FilterLookups {
            customs_candidates: Some(vec![
                (hit, "24 47-3807 4001234".to_string()),
                (Uuid::new_v4(), "99 11 0000 1111111".to_string()),
            ]),
            ..Default::default()
        };
        let compiled = compile(
            &FilterRequest::from_pairs([("customs_declaration", "24473807-4001234")]),
            &lookups,
        );
        assert_eq!(compiled.predicate.clauses().last(), Some(&Clause::UnitIn(vec![hit])));

        let none = compile(
            &FilterRequest::from_pairs([("customs_declaration", "3807 4001234")]),
            &lookups,
        );
        assert!(none.predicate.is_impossible());
    }

    #[test]
    fn test_serial_number_diagnostics() {
        let mut l1 = unit("Blanco");
        l1.lot_name = Some("L1".to_string());
        let mut l2 = unit("Negro");
        l2.lot_name = Some("L2".to_string());

        let compiled = compile(
            &FilterRequest::from_pairs([("serial_numbers", "L1, L3,L2,L3")]),
            &FilterLookups::default(),
        );
        let result = grouped_inventory(&[l1, l2], &compiled, &CategoryTree::default(), &HashMap::new());

        assert_eq!(result.missing_lots, vec!["L3".to_string()]);
        assert_eq!(result.products.len(), 2);
    }

    #[test]
    fn test_price_filter_runs_after_unit_filters() {
        let mut cheap = unit("Blanco");
        cheap.color = Some("white".to_string());
        let mut dear = unit("Calacatta");
        dear.color = Some("white".to_string());
        let mut other = unit("Negro");
        other.color = Some("black".to_string());

        let prices: HashMap<ProductId, ProductPrices> = [
            (cheap.product_id, ProductPrices { usd_high: Some(dec("10.00")), ..Default::default() }),
            (dear.product_id, ProductPrices { usd_high: Some(dec("40.00")), ..Default::default() }),
            (other.product_id, ProductPrices { usd_high: Some(dec("40.00")), ..Default::default() }),
        ]
        .into_iter()
        .collect();

        let units = vec![cheap.clone(), dear.clone(), other];
        let compiled = compile(
            &FilterRequest::from_pairs([("color", "white"), ("price_min", "15")]),
            &FilterLookups::default(),
        );

        let pre_price = reconcile(
            units.iter().filter(|u| compiled.predicate.matches(u)),
            &CategoryTree::default(),
        );
        assert!(pre_price.contains_key(&cheap.product_id));

        let result = grouped_inventory(&units, &compiled, &CategoryTree::default(), &prices);
        let ids: Vec<ProductId> = result.products.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![dear.product_id]);
    }

    #[test]
    fn test_price_range_uses_resolved_column() {
        let request = FilterRequest::from_pairs([
            ("price_max", "100"),
            ("price_currency", "MXN"),
            ("price_level", "medium"),
        ]);
        let compiled = compile(&request, &FilterLookups::default());
        assert_eq!(compiled.price.field, PriceField::MxnMedium);
        assert!(compiled.price.contains(dec("100")));
        assert!(!compiled.price.contains(dec("100.01")));

        let fallback = compile(
            &FilterRequest::from_pairs([("price_max", "1"), ("price_currency", "EUR")]),
            &FilterLookups::default(),
        );
        assert_eq!(fallback.price.field, PriceField::UsdHigh);
    }
}
