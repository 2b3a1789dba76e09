use super::{
    AmountRow, CartStore, RecipeBrief, Relation, RelationStore, StoreError, SubscriptionStore,
};
use crate::schema::{amounts, favorites, ingredients, recipes, shopping_cart, subscriptions};
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Uuid as DieselUuid};
use std::collections::HashMap;
use uuid::Uuid;

/// Each author's newest `$2` recipes, ranked inside the author and ordered
/// newest first overall.
const NEWEST_RECIPES_PER_AUTHOR_QUERY: &str = r#"
SELECT id, author_id, name, cooking_time, created_at
FROM (
    SELECT id, author_id, name, cooking_time, created_at,
           ROW_NUMBER() OVER (
               PARTITION BY author_id
               ORDER BY created_at DESC, id DESC
           ) AS author_rank
    FROM recipes
    WHERE author_id = ANY($1)
) ranked
WHERE author_rank <= $2
ORDER BY created_at DESC, id DESC
"#;

#[derive(Queryable, QueryableByName, Selectable)]
#[diesel(table_name = recipes)]
struct BriefRow {
    id: Uuid,
    author_id: Uuid,
    name: String,
    cooking_time: i32,
    created_at: DateTime<Utc>,
}

/// Store backed by a borrowed PostgreSQL connection.
pub struct PgStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgStore<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl RelationStore for PgStore<'_> {
    fn exists(
        &mut self,
        relation: Relation,
        subject: Uuid,
        object: Uuid,
    ) -> Result<bool, StoreError> {
        let found = match relation {
            Relation::Favorite => diesel::select(diesel::dsl::exists(
                favorites::table
                    .filter(favorites::user_id.eq(subject))
                    .filter(favorites::recipe_id.eq(object)),
            ))
            .get_result(self.conn)?,
            Relation::ShoppingCart => diesel::select(diesel::dsl::exists(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(subject))
                    .filter(shopping_cart::recipe_id.eq(object)),
            ))
            .get_result(self.conn)?,
            Relation::Subscription => diesel::select(diesel::dsl::exists(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(subject))
                    .filter(subscriptions::author_id.eq(object)),
            ))
            .get_result(self.conn)?,
        };
        Ok(found)
    }

    fn insert(&mut self, relation: Relation, subject: Uuid, object: Uuid) -> Result<(), StoreError> {
        match relation {
            Relation::Favorite => diesel::insert_into(favorites::table)
                .values((
                    favorites::user_id.eq(subject),
                    favorites::recipe_id.eq(object),
                ))
                .execute(self.conn)?,
            Relation::ShoppingCart => diesel::insert_into(shopping_cart::table)
                .values((
                    shopping_cart::user_id.eq(subject),
                    shopping_cart::recipe_id.eq(object),
                ))
                .execute(self.conn)?,
            Relation::Subscription => diesel::insert_into(subscriptions::table)
                .values((
                    subscriptions::user_id.eq(subject),
                    subscriptions::author_id.eq(object),
                ))
                .execute(self.conn)?,
        };
        Ok(())
    }

    fn delete(
        &mut self,
        relation: Relation,
        subject: Uuid,
        object: Uuid,
    ) -> Result<usize, StoreError> {
        let deleted = match relation {
            Relation::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(subject))
                    .filter(favorites::recipe_id.eq(object)),
            )
            .execute(self.conn)?,
            Relation::ShoppingCart => diesel::delete(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(subject))
                    .filter(shopping_cart::recipe_id.eq(object)),
            )
            .execute(self.conn)?,
            Relation::Subscription => diesel::delete(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(subject))
                    .filter(subscriptions::author_id.eq(object)),
            )
            .execute(self.conn)?,
        };
        Ok(deleted)
    }
}

impl CartStore for PgStore<'_> {
    fn cart_recipe_ids(&mut self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let ids = shopping_cart::table
            .filter(shopping_cart::user_id.eq(user_id))
            .select(shopping_cart::recipe_id)
            .load(self.conn)?;
        Ok(ids)
    }

    fn amounts_for_recipes(&mut self, recipe_ids: &[Uuid]) -> Result<Vec<AmountRow>, StoreError> {
        let rows: Vec<(Uuid, String, String, i32)> = amounts::table
            .inner_join(ingredients::table)
            .filter(amounts::recipe_id.eq_any(recipe_ids))
            .select((
                amounts::recipe_id,
                ingredients::name,
                ingredients::measurement_unit,
                amounts::amount,
            ))
            .load(self.conn)?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, name, measurement_unit, amount)| AmountRow {
                recipe_id,
                name,
                measurement_unit,
                amount,
            })
            .collect())
    }
}

impl SubscriptionStore for PgStore<'_> {
    fn followed_authors(
        &mut self,
        follower: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Uuid>, StoreError> {
        let authors = subscriptions::table
            .filter(subscriptions::user_id.eq(follower))
            .order((
                subscriptions::created_at.asc(),
                subscriptions::author_id.asc(),
            ))
            .select(subscriptions::author_id)
            .offset(offset)
            .limit(limit)
            .load(self.conn)?;
        Ok(authors)
    }

    fn count_followed(&mut self, follower: Uuid) -> Result<i64, StoreError> {
        let count = subscriptions::table
            .filter(subscriptions::user_id.eq(follower))
            .count()
            .get_result(self.conn)?;
        Ok(count)
    }

    fn recipes_by_authors(
        &mut self,
        authors: &[Uuid],
        per_author: Option<usize>,
    ) -> Result<Vec<RecipeBrief>, StoreError> {
        let rows: Vec<BriefRow> = match per_author {
            Some(limit) => sql_query(NEWEST_RECIPES_PER_AUTHOR_QUERY)
                .bind::<Array<DieselUuid>, _>(authors)
                .bind::<BigInt, _>(i64::try_from(limit).unwrap_or(i64::MAX))
                .load(self.conn)?,
            None => recipes::table
                .filter(recipes::author_id.eq_any(authors))
                .order((recipes::created_at.desc(), recipes::id.desc()))
                .select(BriefRow::as_select())
                .load(self.conn)?,
        };

        Ok(rows
            .into_iter()
            .map(|row| RecipeBrief {
                id: row.id,
                author_id: row.author_id,
                name: row.name,
                cooking_time: row.cooking_time,
                created_at: row.created_at,
            })
            .collect())
    }

    fn recipe_counts(&mut self, authors: &[Uuid]) -> Result<HashMap<Uuid, i64>, StoreError> {
        let rows: Vec<(Uuid, i64)> = recipes::table
            .filter(recipes::author_id.eq_any(authors))
            .group_by(recipes::author_id)
            .select((recipes::author_id, count_star()))
            .load(self.conn)?;
        Ok(rows.into_iter().collect())
    }
}
