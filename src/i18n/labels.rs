//! Static labels, prompts and notices.

pub(super) fn lookup(key: &str) -> Option<&'static str> {
    let s = match key {
        // Menus and generic notices.
        "welcome" => {
            "Привет! Я помогу не забывать поливать растения 🌱\n\n\
             Объедините растения в сценарии полива, укажите дату последнего полива \
             и интервал, а я напомню, когда придёт время."
        }
        "main_menu" => "Главное меню. Что будем делать?",
        "help" => {
            "Команды:\n\
             /menu — главное меню\n\
             /groups — сценарии полива\n\
             /plants — растения\n\
             /cancel — отменить текущее действие\n\n\
             Сценарий полива объединяет растения, которые поливаются в один день. \
             Когда подойдёт срок, я пришлю напоминание, а кнопка под ним отметит полив."
        }
        "cancelled" => "Действие отменено.",
        "something_wrong" => "Что-то пошло не так. Попробуйте ещё раз или нажмите /cancel.",
        "stale_button" => "Эта кнопка устарела. Откройте /menu.",
        "use_buttons" => "Пожалуйста, воспользуйтесь кнопками под сообщением.",
        "use_menu" => "Выберите действие в меню.",
        "photo_not_expected" => "Сейчас я не жду фотографию.",
        "empty_title" => "Название не может быть пустым. Попробуйте ещё раз.",
        "title_too_long" => "Слишком длинное название. Попробуйте короче.",
        "future_date" => "Эта дата ещё не наступила. Выберите сегодняшний или прошедший день.",

        // Scenarios.
        "ask_group_title" => "Как назовём сценарий полива?",
        "ask_group_description" => "Добавьте описание сценария.",
        "ask_last_watering_date" => "Когда растения поливали в последний раз?",
        "ask_watering_interval" => "Как часто поливать? Выберите интервал в днях.",
        "group_exists" => "Сценарий с таким названием уже есть. Введите другое название.",
        "no_groups" => "У вас пока нет сценариев полива.",
        "choose_group" => "Выберите сценарий:",
        "ask_new_group_title" => "Введите новое название сценария.",
        "ask_new_group_description" => "Введите новое описание сценария.",
        "ask_new_last_watering_date" => "Выберите новую дату последнего полива.",
        "ask_new_watering_interval" => "Выберите новый интервал полива.",
        "need_group_first" => "Сначала создайте сценарий полива, в который попадёт растение.",

        // Plants.
        "ask_plant_title" => "Как называется растение?",
        "ask_plant_description" => "Добавьте описание растения.",
        "ask_plant_group" => "В какой сценарий полива добавить растение?",
        "ask_plant_photo_question" => "Хотите добавить фотографию растения?",
        "ask_plant_photo" => "Пришлите фотографию растения.",
        "plant_exists" => "В этом сценарии уже есть растение с таким названием.",
        "no_plants" => "У вас пока нет растений.",
        "choose_plant" => "Выберите растение:",
        "ask_new_plant_title" => "Введите новое название растения.",
        "ask_new_plant_description" => "Введите новое описание растения.",
        "ask_new_plant_group" => "Выберите новый сценарий для растения.",
        "ask_new_plant_photo" => "Пришлите новую фотографию растения.",
        "no_plants_in_group" => "В сценарии пока нет растений.",

        // Buttons.
        "btn_new_group" => "➕ Новый сценарий",
        "btn_groups" => "💧 Сценарии",
        "btn_new_plant" => "➕ Новое растение",
        "btn_plants" => "🪴 Растения",
        "btn_cancel" => "❌ Отмена",
        "btn_confirm" => "✅ Подтвердить",
        "btn_yes" => "Да",
        "btn_no" => "Нет",
        "btn_menu" => "« Меню",
        "btn_title" => "Название",
        "btn_description" => "Описание",
        "btn_last_watering" => "Дата полива",
        "btn_interval" => "Интервал",
        "btn_group" => "Сценарий",
        "btn_photo" => "Фото",
        "btn_delete" => "🗑 Удалить",
        "btn_watered" => "Растения в данном сценарии политы ✅",
        _ => return None,
    };
    Some(s)
}
