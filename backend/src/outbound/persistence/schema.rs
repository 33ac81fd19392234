//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email.
        email -> Varchar,
        /// Unique handle (max 150 characters).
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Avatar reference; null when no avatar is set.
        avatar -> Nullable<Text>,
    }
}

diesel::table! {
    /// Shared ingredient catalog.
    ingredients (id) {
        /// Primary key: sequential identifier.
        id -> Int8,
        name -> Varchar,
        /// Unit every quantity of this ingredient is expressed in.
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Published recipes.
    recipes (id) {
        /// Primary key: sequential identifier, also the short-link input.
        id -> Int8,
        author_id -> Uuid,
        title -> Varchar,
        instructions -> Text,
        cooking_minutes -> Int4,
        image -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Quantified line items, one row per (recipe, ingredient).
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
        quantity -> Int8,
    }
}

diesel::table! {
    /// Favorite relation pairs.
    favorites (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Shopping-cart relation pairs.
    cart_items (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Subscription relation pairs. Both columns reference `users`, so no
    /// `joinable!` is declared; queries over this table join explicitly.
    subscriptions (subscriber_id, author_id) {
        subscriber_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(cart_items -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    ingredients,
    recipes,
    recipe_ingredients,
    favorites,
    cart_items,
    subscriptions,
);
