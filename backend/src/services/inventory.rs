//! Inventory read service: grouped view, unit drill-down and filter options
//!
//! Storage lookups are resolved here and handed to the shared core, which
//! does all of the classification and aggregation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    compile, grouped_inventory, unit_details, Capabilities, Capability, CategoryTree, Clause,
    FilterLookups, FilterRequest, GroupedInventory, ProductId, ProductPrices, StockUnit,
    UnitDetail, UnitExtras, UnitId,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CategoryRow, HoldInfoRow, ProductPriceRow, StockUnitRow};

/// Columns every stock unit query selects; rows decode into [`StockUnitRow`]
pub(crate) const STOCK_UNIT_SELECT: &str = r#"
    SELECT su.id, su.product_id, p.name AS product_name, p.default_code AS product_code,
           p.category_id, p.uom_name,
           su.lot_id, l.name AS lot_name,
           su.location_id, loc.complete_name AS location_name,
           loc.parent_path AS location_parent_path, loc.usage AS location_usage,
           su.quantity, su.reserved_quantity,
           EXISTS(
               SELECT 1 FROM holds h WHERE h.unit_id = su.id AND h.state = 'active'
           ) AS has_active_hold,
           l.height, l.width, l.thickness,
           p.stone_type, p.group_id, p.finish, p.color, p.format,
           l.block, l.bundle, l.container, l.customs_declaration, l.supplier_reference
    FROM stock_units su
    JOIN products p ON p.id = su.product_id
    JOIN locations loc ON loc.id = su.location_id
    LEFT JOIN lots l ON l.id = su.lot_id
"#;

/// Inventory read service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Distinct values offered by the filter bar
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub colors: Vec<String>,
    pub thicknesses: Vec<Decimal>,
    pub categories: Vec<CategoryOption>,
    pub warehouses: Vec<WarehouseOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WarehouseOption {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

/// Sale orders linked to units
#[derive(Debug, Clone, Serialize)]
pub struct SaleOrderInfo {
    pub count: usize,
    pub orders: Vec<SaleOrderSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleOrderSummary {
    pub id: Uuid,
    pub name: String,
    pub partner_name: String,
    pub seller_name: String,
    pub date_order: String,
    pub state: String,
    pub amount_total: Decimal,
    pub currency: String,
}

#[derive(Debug, FromRow)]
struct SaleOrderRow {
    id: Uuid,
    name: String,
    partner_name: String,
    seller_name: Option<String>,
    date_order: DateTime<Utc>,
    state: String,
    amount_total: Decimal,
    currency: String,
}

#[derive(Debug, FromRow)]
struct LotExtrasRow {
    id: Uuid,
    plate_notes: String,
    photo_count: i64,
}

#[derive(Debug, FromRow)]
struct UnitOrderRow {
    unit_id: Uuid,
    sale_order_id: Uuid,
}

/// `%term%` for ILIKE with the wildcard characters of `term` escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Translate one compiled clause into SQL over [`STOCK_UNIT_SELECT`]
fn push_clause(qb: &mut QueryBuilder<'_, Postgres>, clause: &Clause) {
    match clause {
        Clause::PositiveQuantity => {
            qb.push("su.quantity > 0");
        }
        Clause::ProductNameContains(term) => {
            qb.push("p.name ILIKE ").push_bind(like_pattern(term));
        }
        Clause::WithinLocation(root) => {
            qb.push("(su.location_id = ")
                .push_bind(*root)
                .push(" OR loc.parent_path LIKE ")
                .push_bind(format!("%{}/%", root))
                .push(")");
        }
        Clause::TypeEquals(value) => {
            qb.push("p.stone_type = ").push_bind(value.clone());
        }
        Clause::CategoryIn(ids) => {
            qb.push("p.category_id = ANY(").push_bind(ids.clone()).push(")");
        }
        Clause::GroupIn(ids) => {
            qb.push("p.group_id = ANY(").push_bind(ids.clone()).push(")");
        }
        Clause::FinishEquals(value) => {
            qb.push("p.finish = ").push_bind(value.clone());
        }
        Clause::ColorContains(term) => {
            qb.push("p.color ILIKE ").push_bind(like_pattern(term));
        }
        Clause::ThicknessBetween { low, high } => {
            qb.push("l.thickness BETWEEN ")
                .push_bind(*low)
                .push(" AND ")
                .push_bind(*high);
        }
        Clause::LotNameIn(names) => {
            qb.push("l.name = ANY(").push_bind(names.clone()).push(")");
        }
        Clause::BlockContains(term) => {
            qb.push("l.block ILIKE ").push_bind(like_pattern(term));
        }
        Clause::ContainerContains(term) => {
            qb.push("l.container ILIKE ").push_bind(like_pattern(term));
        }
        Clause::BundleContains(term) => {
            qb.push("l.bundle ILIKE ").push_bind(like_pattern(term));
        }
        Clause::UnitIn(ids) => {
            qb.push("su.id = ANY(").push_bind(ids.clone()).push(")");
        }
        Clause::MinHeight(min) => {
            qb.push("l.height >= ").push_bind(*min);
        }
        Clause::MinWidth(min) => {
            qb.push("l.width >= ").push_bind(*min);
        }
        Clause::Impossible => {
            qb.push("FALSE");
        }
    }
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Products matching the filters with reconciled quantities
    pub async fn get_grouped_inventory(
        &self,
        request: &FilterRequest,
        capabilities: &Capabilities,
    ) -> AppResult<GroupedInventory> {
        capabilities.require(Capability::ViewInventory)?;

        if request.is_empty() {
            return Ok(GroupedInventory::default());
        }

        let categories = self.load_categories().await?;
        let lookups = self.resolve_lookups(request, categories).await?;
        let compiled = compile(request, &lookups);

        if compiled.predicate.is_impossible() {
            tracing::debug!("filter resolved to an impossible condition");
            return Ok(grouped_inventory(
                &[],
                &compiled,
                &lookups.categories,
                &HashMap::new(),
            ));
        }

        let mut qb = QueryBuilder::<Postgres>::new(STOCK_UNIT_SELECT);
        qb.push(" WHERE ");
        for (i, clause) in compiled.predicate.clauses().iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            push_clause(&mut qb, clause);
        }
        qb.push(" ORDER BY p.name, su.id");

        let units: Vec<StockUnit> = qb
            .build_query_as::<StockUnitRow>()
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StockUnit::from)
            .collect();

        let prices = if compiled.price.is_active() {
            let mut product_ids: Vec<ProductId> = units.iter().map(|u| u.product_id).collect();
            product_ids.sort();
            product_ids.dedup();
            self.load_prices(&product_ids).await?
        } else {
            HashMap::new()
        };

        let result = grouped_inventory(&units, &compiled, &lookups.categories, &prices);
        tracing::info!(
            units = units.len(),
            products = result.products.len(),
            missing_lots = result.missing_lots.len(),
            "grouped inventory computed"
        );
        Ok(result)
    }

    /// Per-unit projection for the drill-down panel
    pub async fn get_unit_details(
        &self,
        unit_ids: &[UnitId],
        include_sales: bool,
        capabilities: &Capabilities,
    ) -> AppResult<Vec<UnitDetail>> {
        capabilities.require(Capability::ViewInventory)?;
        if include_sales {
            capabilities.require(Capability::ViewSalesData)?;
        }
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut units: Vec<StockUnit> =
            sqlx::query_as::<_, StockUnitRow>(&format!("{} WHERE su.id = ANY($1)", STOCK_UNIT_SELECT))
                .bind(unit_ids)
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .map(StockUnit::from)
                .collect();

        let position: HashMap<UnitId, usize> =
            unit_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        units.sort_by_key(|u| position.get(&u.id).copied().unwrap_or(usize::MAX));

        let lot_ids: Vec<Uuid> = units.iter().filter_map(|u| u.lot_id).collect();
        let lot_extras: HashMap<Uuid, LotExtrasRow> = sqlx::query_as::<_, LotExtrasRow>(
            r#"
            SELECT l.id, l.plate_notes,
                   (SELECT COUNT(*) FROM lot_photos ph WHERE ph.lot_id = l.id) AS photo_count
            FROM lots l
            WHERE l.id = ANY($1)
            "#,
        )
        .bind(&lot_ids)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| (row.id, row))
        .collect();

        let mut extras: HashMap<UnitId, UnitExtras> = units
            .iter()
            .map(|unit| {
                let lot = unit.lot_id.and_then(|id| lot_extras.get(&id));
                let unit_extras = UnitExtras {
                    photo_count: lot.map_or(0, |l| l.photo_count),
                    plate_notes: lot.map(|l| l.plate_notes.clone()).unwrap_or_default(),
                    ..Default::default()
                };
                (unit.id, unit_extras)
            })
            .collect();

        if include_sales {
            self.attach_sales_data(unit_ids, &mut extras).await?;
        }

        Ok(unit_details(&units, extras, include_sales, capabilities)?)
    }

    async fn attach_sales_data(
        &self,
        unit_ids: &[UnitId],
        extras: &mut HashMap<UnitId, UnitExtras>,
    ) -> AppResult<()> {
        let holds = sqlx::query_as::<_, HoldInfoRow>(
            r#"
            SELECT h.unit_id, h.id, pa.name AS partner_name, pr.name AS project_name,
                   ar.name AS architect_name, u.name AS seller_name,
                   h.starts_at, h.expires_at, h.notes
            FROM holds h
            JOIN partners pa ON pa.id = h.partner_id
            LEFT JOIN projects pr ON pr.id = h.project_id
            LEFT JOIN partners ar ON ar.id = h.architect_id
            LEFT JOIN users u ON u.id = h.seller_id
            WHERE h.unit_id = ANY($1) AND h.state = 'active'
            "#,
        )
        .bind(unit_ids)
        .fetch_all(&self.db)
        .await?;

        for row in holds {
            if let Some(entry) = extras.get_mut(&row.unit_id) {
                entry.hold = Some(row.into());
            }
        }

        let orders = sqlx::query_as::<_, UnitOrderRow>(
            r#"
            SELECT sou.unit_id, sou.sale_order_id
            FROM sale_order_units sou
            JOIN sale_orders so ON so.id = sou.sale_order_id
            WHERE sou.unit_id = ANY($1) AND so.state IN ('sale', 'done')
            ORDER BY so.date_order
            "#,
        )
        .bind(unit_ids)
        .fetch_all(&self.db)
        .await?;

        for row in orders {
            if let Some(entry) = extras.get_mut(&row.unit_id) {
                if !entry.sale_order_ids.contains(&row.sale_order_id) {
                    entry.sale_order_ids.push(row.sale_order_id);
                }
            }
        }

        Ok(())
    }

    /// Distinct colors and thicknesses in stock, categories and warehouses
    pub async fn get_filter_options(&self, capabilities: &Capabilities) -> AppResult<FilterOptions> {
        capabilities.require(Capability::ViewInventory)?;

        let colors = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT p.color
            FROM stock_units su
            JOIN products p ON p.id = su.product_id
            WHERE su.quantity > 0 AND p.color IS NOT NULL AND p.color <> ''
            ORDER BY p.color
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let thicknesses = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT DISTINCT l.thickness
            FROM stock_units su
            JOIN lots l ON l.id = su.lot_id
            WHERE su.quantity > 0 AND l.thickness IS NOT NULL
            ORDER BY l.thickness
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let tree = self.load_categories().await?;
        let mut categories: Vec<CategoryOption> = tree
            .iter()
            .map(|c| CategoryOption {
                id: c.id,
                name: tree.complete_name(c.id),
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        let warehouses = sqlx::query_as::<_, WarehouseOption>(
            "SELECT id, name, code FROM warehouses ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(FilterOptions {
            colors,
            thicknesses,
            categories,
            warehouses,
        })
    }

    /// Summaries of the given sale orders
    pub async fn get_sale_order_info(
        &self,
        order_ids: &[Uuid],
        capabilities: &Capabilities,
    ) -> AppResult<SaleOrderInfo> {
        capabilities.require(Capability::ViewSalesData)?;
        if order_ids.is_empty() {
            return Ok(SaleOrderInfo {
                count: 0,
                orders: Vec::new(),
            });
        }

        let orders: Vec<SaleOrderSummary> = sqlx::query_as::<_, SaleOrderRow>(
            r#"
            SELECT so.id, so.name, pa.name AS partner_name, u.name AS seller_name,
                   so.date_order, so.state, so.amount_total, so.currency
            FROM sale_orders so
            JOIN partners pa ON pa.id = so.partner_id
            LEFT JOIN users u ON u.id = so.seller_id
            WHERE so.id = ANY($1)
            ORDER BY so.date_order DESC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| SaleOrderSummary {
            id: row.id,
            name: row.name,
            partner_name: row.partner_name,
            seller_name: row.seller_name.unwrap_or_default(),
            date_order: row.date_order.format("%Y-%m-%d").to_string(),
            state: row.state,
            amount_total: row.amount_total,
            currency: row.currency,
        })
        .collect();

        Ok(SaleOrderInfo {
            count: orders.len(),
            orders,
        })
    }

    async fn load_categories(&self) -> AppResult<CategoryTree> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, parent_id FROM product_categories",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(CategoryTree::new(rows.into_iter().map(Into::into)))
    }

    /// Price tiers of the given products
    pub(crate) async fn load_prices(
        &self,
        product_ids: &[ProductId],
    ) -> AppResult<HashMap<ProductId, ProductPrices>> {
        let rows = sqlx::query_as::<_, ProductPriceRow>(
            r#"
            SELECT id, price_usd_1, price_usd_2, price_usd_3,
                   price_mxn_1, price_mxn_2, price_mxn_3
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.iter().map(|row| (row.id, ProductPrices::from(row))).collect())
    }

    /// Resolve the storage lookups the request needs
    async fn resolve_lookups(
        &self,
        request: &FilterRequest,
        categories: CategoryTree,
    ) -> AppResult<FilterLookups> {
        let mut lookups = FilterLookups {
            categories,
            ..Default::default()
        };

        if let Some(warehouse_id) = request.warehouse_id.value() {
            lookups.warehouse_root = sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT view_location_id FROM warehouses WHERE id = $1",
            )
            .bind(warehouse_id)
            .fetch_optional(&self.db)
            .await?
            .flatten();
        }

        if let Some(term) = &request.group {
            let ids = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM product_groups WHERE name ILIKE $1",
            )
            .bind(like_pattern(term))
            .fetch_all(&self.db)
            .await?;
            lookups.group_matches = Some(ids);
        }

        if request.customs_declaration.is_some() {
            let candidates = sqlx::query_as::<_, (Uuid, String)>(
                r#"
                SELECT su.id, l.customs_declaration
                FROM stock_units su
                JOIN lots l ON l.id = su.lot_id
                WHERE su.quantity > 0
                  AND l.customs_declaration IS NOT NULL
                  AND l.customs_declaration <> ''
                "#,
            )
            .fetch_all(&self.db)
            .await?;
            lookups.customs_candidates = Some(candidates);
        }

        Ok(lookups)
    }
}
