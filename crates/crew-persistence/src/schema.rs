// Mantener en sincronía con migrations/.

diesel::table! {
    reports (id) {
        id -> Text,
        status -> Text,
        result -> Nullable<Jsonb>,
        input_payload -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
