//! Shopping list report service.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{map_repository_error, ShoppingListQuery};
use crate::domain::shopping_list::{render, ShoppingListReport};
use crate::domain::user::Actor;
use crate::domain::Error;

/// Builds the consolidated shopping list for the acting user's cart.
#[derive(Clone)]
pub struct ShoppingListService {
    query: Arc<dyn ShoppingListQuery>,
    clock: Arc<dyn Clock>,
}

impl ShoppingListService {
    /// Create a new service with the given query port and clock.
    pub fn new(query: Arc<dyn ShoppingListQuery>, clock: Arc<dyn Clock>) -> Self {
        Self { query, clock }
    }

    /// Aggregate the cart into a report. An empty cart yields
    /// [`ShoppingListReport::Empty`], never an error.
    pub async fn build(&self, actor: &Actor) -> Result<ShoppingListReport, Error> {
        let user = actor.require_user()?;
        let lines = self
            .query
            .cart_lines(&user)
            .await
            .map_err(map_repository_error)?;
        let recipes = self
            .query
            .cart_recipes(&user)
            .await
            .map_err(map_repository_error)?;
        Ok(render(self.clock.utc(), &lines, &recipes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockShoppingListQuery;
    use crate::domain::shopping_list::{CartLine, CartRecipe};
    use crate::domain::user::UserId;
    use mockable::DefaultClock;

    fn line(name: &str, unit: &str, quantity: i64) -> CartLine {
        CartLine {
            ingredient_name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            quantity,
        }
    }

    #[tokio::test]
    async fn anonymous_actor_cannot_download_a_report() {
        let service = ShoppingListService::new(
            Arc::new(MockShoppingListQuery::new()),
            Arc::new(DefaultClock),
        );
        let error = service.build(&Actor::Anonymous).await.expect_err("login");
        assert_eq!(error.code(), "unauthorized");
    }

    #[tokio::test]
    async fn empty_cart_is_an_explicit_status() {
        let mut query = MockShoppingListQuery::new();
        query.expect_cart_lines().times(1).returning(|_| Ok(Vec::new()));
        query
            .expect_cart_recipes()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let service = ShoppingListService::new(Arc::new(query), Arc::new(DefaultClock));
        let report = service
            .build(&Actor::Authenticated(UserId::random()))
            .await
            .expect("report");
        assert_eq!(report, ShoppingListReport::Empty);
    }

    #[tokio::test]
    async fn cart_rows_are_grouped_and_summed() {
        let mut query = MockShoppingListQuery::new();
        query.expect_cart_lines().times(1).returning(|_| {
            Ok(vec![
                line("flour", "g", 200),
                line("egg", "pcs", 2),
                line("flour", "g", 100),
            ])
        });
        query.expect_cart_recipes().times(1).returning(|_| {
            Ok(vec![CartRecipe {
                title: "Pancakes".to_owned(),
                author_first_name: "Ada".to_owned(),
                author_last_name: "Lovelace".to_owned(),
                author_username: "ada".to_owned(),
            }])
        });

        let service = ShoppingListService::new(Arc::new(query), Arc::new(DefaultClock));
        let report = service
            .build(&Actor::Authenticated(UserId::random()))
            .await
            .expect("report");
        let ShoppingListReport::Rendered(text) = report else {
            panic!("expected a rendered report");
        };
        assert!(text.contains("1. egg - 2 pcs"));
        assert!(text.contains("2. flour - 300 g"));
        assert!(text.contains("\u{2022} Pancakes (by Ada Lovelace @ada)"));
    }
}
